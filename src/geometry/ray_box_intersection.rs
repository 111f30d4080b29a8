use super::{AABB, EPSILON, FloatType, Ray};

pub trait RayIntersectionExt {
    /// Returns the latest slab entry and the earliest slab exit along the ray.
    /// The ray intersects if entry <= exit.
    fn slab_range(&self, ray: &Ray) -> (FloatType, FloatType);

    /// Calculate first and last ray intersection with the box, None if the ray misses.
    fn intersect(&self, ray: &Ray) -> Option<(FloatType, FloatType)> {
        let (t_min, t_max) = self.slab_range(ray);
        if t_min <= t_max {
            Some((t_min, t_max))
        } else {
            None
        }
    }
}

impl RayIntersectionExt for AABB {
    fn slab_range(&self, ray: &Ray) -> (FloatType, FloatType) {
        if self.is_empty() {
            return (FloatType::INFINITY, FloatType::NEG_INFINITY);
        }

        let mut t_min = FloatType::NEG_INFINITY;
        let mut t_max = FloatType::INFINITY;

        for axis in 0..3 {
            let (axis_min, axis_max) = slab(
                ray.origin[axis],
                ray.direction[axis],
                self.min[axis],
                self.max[axis],
            );
            t_min = t_min.max(axis_min);
            t_max = t_max.min(axis_max);
        }

        (t_min, t_max)
    }
}

/// Entry and exit ray parameters for one axis slab `[min, max]`.
///
/// Directions within EPSILON of zero are treated as parallel to the slab. The distances
/// then become infinite, positive or negative depending on which side of each bounding
/// plane the origin lies. A ray starting outside the slab gets an empty range, one
/// starting inside gets `(-inf, inf)`.
pub fn slab(
    origin: FloatType,
    direction: FloatType,
    min: FloatType,
    max: FloatType,
) -> (FloatType, FloatType) {
    let to_min = min - origin;
    let to_max = max - origin;

    let (t1, t2) = if direction.abs() >= EPSILON {
        (to_min / direction, to_max / direction)
    } else {
        // The multiplication is NAN if the ray is starting on the slab bounding plane.
        // In this case we blend to +-infinity, so that the range becomes infinite
        let t1 = to_min * FloatType::INFINITY;
        let t2 = to_max * FloatType::INFINITY;
        (
            if t1.is_nan() { FloatType::NEG_INFINITY } else { t1 },
            if t2.is_nan() { FloatType::INFINITY } else { t2 },
        )
    };

    // Correctly ordered (min_t <= max_t)
    (t1.min(t2), t1.max(t2))
}
