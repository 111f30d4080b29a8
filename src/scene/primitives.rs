use arrayvec::ArrayVec;

use crate::geometry::{AABB, EPSILON, FloatType, Ray, RayIntersectionExt as _, WorldPoint, WorldVector};

/// Ray parameters of a single primitive hit, at most two walls plus two caps.
pub type LocalHits = ArrayVec<FloatType, 4>;

/// Geometry of a primitive in its own object space.
pub trait Object {
    /// Ray parameters where `ray` (in object space) hits the surface, in no particular order.
    fn local_intersect(&self, ray: &Ray) -> LocalHits;

    /// Surface normal at a point on the surface, not necessarily normalized.
    fn local_normal_at(&self, point: &WorldPoint) -> WorldVector;

    /// Object space extent.
    fn bounds(&self) -> AABB;
}

/// Unit sphere centered at the origin.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Sphere;

/// The xz plane, normal pointing towards +y.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Plane;

/// Axis aligned cube spanning [-1, 1] on all axes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Cube;

/// Radius 1 tube around the y axis, clipped to `minimum < y < maximum`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cylinder {
    pub minimum: FloatType,
    pub maximum: FloatType,
    /// Whether the ends are capped with disks
    pub closed: bool,
}

/// Double napped cone with apex in the origin, radius equal to |y|,
/// clipped to `minimum < y < maximum`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cone {
    pub minimum: FloatType,
    pub maximum: FloatType,
    /// Whether the ends are capped with disks
    pub closed: bool,
}

impl Object for Sphere {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let sphere_to_ray = ray.origin.coords;
        let a = ray.direction.dot(&ray.direction);
        let b = 2.0 * ray.direction.dot(&sphere_to_ray);
        let c = sphere_to_ray.dot(&sphere_to_ray) - 1.0;

        solve_quadratic(a, b, c).into_iter().flatten().collect()
    }

    fn local_normal_at(&self, point: &WorldPoint) -> WorldVector {
        point.coords
    }

    fn bounds(&self) -> AABB {
        unit_box()
    }
}

impl Object for Plane {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut hits = LocalHits::new();
        // Parallel and coplanar rays both miss
        if ray.direction.y.abs() >= EPSILON {
            hits.push(-ray.origin.y / ray.direction.y);
        }
        hits
    }

    fn local_normal_at(&self, _point: &WorldPoint) -> WorldVector {
        WorldVector::y()
    }

    fn bounds(&self) -> AABB {
        AABB::new(
            WorldPoint::new(FloatType::NEG_INFINITY, 0.0, FloatType::NEG_INFINITY),
            WorldPoint::new(FloatType::INFINITY, 0.0, FloatType::INFINITY),
        )
    }
}

impl Object for Cube {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        unit_box()
            .intersect(ray)
            .map(|(t_min, t_max)| [t_min, t_max].into_iter().collect())
            .unwrap_or_default()
    }

    fn local_normal_at(&self, point: &WorldPoint) -> WorldVector {
        let abs = point.coords.abs();
        if abs.x >= abs.y && abs.x >= abs.z {
            WorldVector::new(point.x, 0.0, 0.0)
        } else if abs.y >= abs.z {
            WorldVector::new(0.0, point.y, 0.0)
        } else {
            WorldVector::new(0.0, 0.0, point.z)
        }
    }

    fn bounds(&self) -> AABB {
        unit_box()
    }
}

impl Cylinder {
    pub fn new(minimum: FloatType, maximum: FloatType, closed: bool) -> Cylinder {
        Cylinder {
            minimum,
            maximum,
            closed,
        }
    }
}

impl Default for Cylinder {
    /// Infinite open cylinder.
    fn default() -> Self {
        Cylinder::new(FloatType::NEG_INFINITY, FloatType::INFINITY, false)
    }
}

impl Object for Cylinder {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut hits = LocalHits::new();

        let a = ray.direction.x.powi(2) + ray.direction.z.powi(2);
        // Rays parallel to the y axis can only hit the caps
        if a >= EPSILON {
            let b = 2.0 * (ray.origin.x * ray.direction.x + ray.origin.z * ray.direction.z);
            let c = ray.origin.x.powi(2) + ray.origin.z.powi(2) - 1.0;
            let Some(roots) = solve_quadratic(a, b, c) else {
                return hits;
            };
            push_clipped(&mut hits, ray, &roots, self.minimum, self.maximum);
        }

        if self.closed {
            intersect_caps(&mut hits, ray, [(self.minimum, 1.0), (self.maximum, 1.0)]);
        }

        hits
    }

    fn local_normal_at(&self, point: &WorldPoint) -> WorldVector {
        let dist = point.x.powi(2) + point.z.powi(2);
        if dist < 1.0 && point.y >= self.maximum - EPSILON {
            WorldVector::y()
        } else if dist < 1.0 && point.y <= self.minimum + EPSILON {
            -WorldVector::y()
        } else {
            WorldVector::new(point.x, 0.0, point.z)
        }
    }

    fn bounds(&self) -> AABB {
        AABB::new(
            WorldPoint::new(-1.0, self.minimum, -1.0),
            WorldPoint::new(1.0, self.maximum, 1.0),
        )
    }
}

impl Cone {
    pub fn new(minimum: FloatType, maximum: FloatType, closed: bool) -> Cone {
        Cone {
            minimum,
            maximum,
            closed,
        }
    }
}

impl Default for Cone {
    /// Infinite open double cone.
    fn default() -> Self {
        Cone::new(FloatType::NEG_INFINITY, FloatType::INFINITY, false)
    }
}

impl Object for Cone {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        let mut hits = LocalHits::new();
        let (o, d) = (&ray.origin, &ray.direction);

        let a = d.x.powi(2) - d.y.powi(2) + d.z.powi(2);
        let b = 2.0 * (o.x * d.x - o.y * d.y + o.z * d.z);
        let c = o.x.powi(2) - o.y.powi(2) + o.z.powi(2);

        if a.abs() >= EPSILON {
            let Some(roots) = solve_quadratic(a, b, c) else {
                return hits;
            };
            push_clipped(&mut hits, ray, &roots, self.minimum, self.maximum);
        } else if b.abs() >= EPSILON {
            // Ray parallel to one of the nappes, the quadratic degenerates to a line
            push_clipped(&mut hits, ray, &[-c / (2.0 * b)], self.minimum, self.maximum);
        }

        if self.closed {
            intersect_caps(
                &mut hits,
                ray,
                [
                    (self.minimum, self.minimum.powi(2)),
                    (self.maximum, self.maximum.powi(2)),
                ],
            );
        }

        hits
    }

    fn local_normal_at(&self, point: &WorldPoint) -> WorldVector {
        let dist = point.x.powi(2) + point.z.powi(2);
        if dist < self.maximum.powi(2) && point.y >= self.maximum - EPSILON {
            WorldVector::y()
        } else if dist < self.minimum.powi(2) && point.y <= self.minimum + EPSILON {
            -WorldVector::y()
        } else if dist < EPSILON * EPSILON {
            // Apex, the surface has no well defined normal here
            WorldVector::y()
        } else {
            let y = dist.sqrt();
            WorldVector::new(point.x, if point.y > 0.0 { -y } else { y }, point.z)
        }
    }

    fn bounds(&self) -> AABB {
        let limit = self.minimum.abs().max(self.maximum.abs());
        AABB::new(
            WorldPoint::new(-limit, self.minimum, -limit),
            WorldPoint::new(limit, self.maximum, limit),
        )
    }
}

fn unit_box() -> AABB {
    AABB::new(
        WorldPoint::new(-1.0, -1.0, -1.0),
        WorldPoint::new(1.0, 1.0, 1.0),
    )
}

/// Real roots of `a t^2 + b t + c`, in ascending order.
/// Tangent rays produce two equal roots, negative discriminant produces None.
fn solve_quadratic(a: FloatType, b: FloatType, c: FloatType) -> Option<[FloatType; 2]> {
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / (2.0 * a);
    let t2 = (-b + sqrt_disc) / (2.0 * a);

    Some(if t1 <= t2 { [t1, t2] } else { [t2, t1] })
}

/// Keeps only wall hits strictly between the clipping heights.
fn push_clipped(
    hits: &mut LocalHits,
    ray: &Ray,
    roots: &[FloatType],
    minimum: FloatType,
    maximum: FloatType,
) {
    for &t in roots {
        let y = ray.origin.y + t * ray.direction.y;
        if minimum < y && y < maximum {
            hits.push(t);
        }
    }
}

/// Intersects the cap disks, each given as (height, squared radius).
fn intersect_caps(hits: &mut LocalHits, ray: &Ray, caps: [(FloatType, FloatType); 2]) {
    if ray.direction.y.abs() < EPSILON {
        return;
    }

    for (height, radius_squared) in caps {
        let t = (height - ray.origin.y) / ray.direction.y;
        let x = ray.origin.x + t * ray.direction.x;
        let z = ray.origin.z + t * ray.direction.z;
        if x * x + z * z <= radius_squared {
            hits.push(t);
        }
    }
}
