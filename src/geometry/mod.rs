mod aabb;
mod ray_box_intersection;
mod transform;

use thiserror::Error;

pub use aabb::AABB;
pub use ray_box_intersection::{RayIntersectionExt, slab};
pub use transform::Transform;

pub type FloatType = f64;

/// Tolerance shared by every geometric comparison against zero.
/// Changing it changes parallel ray detection, cap detection, normal classification
/// and the over / under point bias all at once.
pub const EPSILON: FloatType = 1e-5;

pub type WorldPoint = nalgebra::Point3<FloatType>;
pub type WorldVector = nalgebra::Vector3<FloatType>;
pub type WorldMatrix = nalgebra::Matrix4<FloatType>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Transform matrix is not invertible: {0}")]
    NonInvertible(WorldMatrix),
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Ray {
    pub origin: WorldPoint,
    /// Direction of the ray, not necessarily normalized.
    /// Ray parameters are only comparable between rays that share the same scaling of
    /// the direction, so this is never normalized implicitly.
    pub direction: WorldVector,
}

impl Ray {
    pub fn new(origin: WorldPoint, direction: WorldVector) -> Ray {
        Ray { origin, direction }
    }

    pub fn position(&self, t: FloatType) -> WorldPoint {
        self.origin + self.direction * t
    }

    /// Maps the ray through an affine matrix, origin as a point and direction as a vector.
    pub fn transform(&self, matrix: &WorldMatrix) -> Ray {
        Ray {
            origin: matrix.transform_point(&self.origin),
            direction: matrix.fixed_view::<3, 3>(0, 0) * self.direction,
        }
    }
}

/// Reflects vector `v` around normal `n`.
pub fn reflect(v: &WorldVector, n: &WorldVector) -> WorldVector {
    v - n * (2.0 * v.dot(n))
}

pub fn approx_eq(a: FloatType, b: FloatType) -> bool {
    (a - b).abs() < EPSILON
}
