use itertools::iproduct;

use super::{FloatType, WorldMatrix, WorldPoint};

/// Axis aligned bounding box.
/// Extents may be infinite (planes, open cylinders and cones).
#[derive(Clone, Debug, PartialEq)]
pub struct AABB {
    pub min: WorldPoint,
    pub max: WorldPoint,
}

impl AABB {
    pub fn new(min: WorldPoint, max: WorldPoint) -> AABB {
        AABB { min, max }
    }

    /// Box that contains nothing, identity element of `union`.
    pub fn empty() -> AABB {
        AABB {
            min: WorldPoint::from([FloatType::INFINITY; 3]),
            max: WorldPoint::from([FloatType::NEG_INFINITY; 3]),
        }
    }

    /// Box that contains everything.
    pub fn unbounded() -> AABB {
        AABB {
            min: WorldPoint::from([FloatType::NEG_INFINITY; 3]),
            max: WorldPoint::from([FloatType::INFINITY; 3]),
        }
    }

    pub fn is_empty(&self) -> bool {
        (0..3).any(|i| self.min[i] > self.max[i])
    }

    /// Widens the box to include `point`. NaN coordinates are ignored.
    pub fn add_point(&mut self, point: &WorldPoint) {
        for i in 0..3 {
            self.min[i] = self.min[i].min(point[i]);
            self.max[i] = self.max[i].max(point[i]);
        }
    }

    pub fn union(&self, other: &AABB) -> AABB {
        if other.is_empty() {
            return self.clone();
        }
        let mut ret = self.clone();
        ret.add_point(&other.min);
        ret.add_point(&other.max);
        ret
    }

    pub fn contains_point(&self, point: &WorldPoint) -> bool {
        (0..3).all(|i| self.min[i] <= point[i] && point[i] <= self.max[i])
    }

    pub fn contains_box(&self, other: &AABB) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Iterates all 8 corners of the box.
    pub fn corners(&self) -> impl Iterator<Item = WorldPoint> {
        let (min, max) = (self.min, self.max);
        iproduct!([min.x, max.x], [min.y, max.y], [min.z, max.z])
            .map(|(x, y, z)| WorldPoint::new(x, y, z))
    }

    /// Smallest axis aligned box enclosing this box after transforming it by `matrix`.
    ///
    /// All eight corners are transformed, because the image of a box under rotation is
    /// generally not axis aligned anymore.
    pub fn transform(&self, matrix: &WorldMatrix) -> AABB {
        if self.is_empty() {
            return self.clone();
        }

        let mut ret = AABB::empty();
        for corner in self.corners() {
            ret.add_point(&transform_corner(matrix, &corner));
        }
        ret
    }
}

impl Default for AABB {
    fn default() -> Self {
        AABB::unbounded()
    }
}

/// Affine point transform where zero matrix entries contribute nothing, even when
/// multiplied with an infinite coordinate.
fn transform_corner(matrix: &WorldMatrix, point: &WorldPoint) -> WorldPoint {
    let mut ret = WorldPoint::origin();
    for row in 0..3 {
        ret[row] = (0..3)
            .filter(|&col| matrix[(row, col)] != 0.0)
            .map(|col| matrix[(row, col)] * point[col])
            .sum::<FloatType>()
            + matrix[(row, 3)];
    }
    ret
}
