use std::ops::Mul;

use nalgebra::{Isometry3, Matrix3, Rotation3};

use super::{FloatType, GeometryError, WorldMatrix, WorldPoint, WorldVector};

/// Invertible affine transform with its inverse and normal matrix precomputed.
///
/// Inversion happens once at construction; every intersect and normal computation
/// afterwards only reads the cached matrices.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    matrix: WorldMatrix,
    inverse: WorldMatrix,
    /// Transposed inverse of the linear part, maps object space normals to the parent frame.
    normal_matrix: Matrix3<FloatType>,
}

impl Transform {
    pub fn new(matrix: WorldMatrix) -> Result<Transform, GeometryError> {
        let inverse = matrix
            .try_inverse()
            .ok_or(GeometryError::NonInvertible(matrix))?;
        Ok(Transform {
            matrix,
            inverse,
            normal_matrix: inverse.fixed_view::<3, 3>(0, 0).transpose(),
        })
    }

    pub fn identity() -> Transform {
        Transform {
            matrix: WorldMatrix::identity(),
            inverse: WorldMatrix::identity(),
            normal_matrix: Matrix3::identity(),
        }
    }

    pub fn translation(x: FloatType, y: FloatType, z: FloatType) -> Transform {
        let offset = WorldVector::new(x, y, z);
        Transform {
            matrix: WorldMatrix::new_translation(&offset),
            inverse: WorldMatrix::new_translation(&-offset),
            normal_matrix: Matrix3::identity(),
        }
    }

    /// Scaling along the axes; fails if any of the factors is zero.
    pub fn scaling(x: FloatType, y: FloatType, z: FloatType) -> Result<Transform, GeometryError> {
        Transform::new(WorldMatrix::new_nonuniform_scaling(&WorldVector::new(x, y, z)))
    }

    pub fn rotation_x(angle: FloatType) -> Transform {
        Self::rotation(Rotation3::from_axis_angle(&WorldVector::x_axis(), angle))
    }

    pub fn rotation_y(angle: FloatType) -> Transform {
        Self::rotation(Rotation3::from_axis_angle(&WorldVector::y_axis(), angle))
    }

    pub fn rotation_z(angle: FloatType) -> Transform {
        Self::rotation(Rotation3::from_axis_angle(&WorldVector::z_axis(), angle))
    }

    fn rotation(rotation: Rotation3<FloatType>) -> Transform {
        // Rotations are orthonormal, the inverse transpose is the rotation itself
        Transform {
            matrix: rotation.to_homogeneous(),
            inverse: rotation.inverse().to_homogeneous(),
            normal_matrix: *rotation.matrix(),
        }
    }

    /// Shear moving each coordinate in proportion to the other two.
    /// `xy` is the amount x moves in proportion to y, and so on.
    pub fn shearing(
        xy: FloatType,
        xz: FloatType,
        yx: FloatType,
        yz: FloatType,
        zx: FloatType,
        zy: FloatType,
    ) -> Result<Transform, GeometryError> {
        #[rustfmt::skip]
        let matrix = WorldMatrix::new(
            1.0, xy,  xz,  0.0,
            yx,  1.0, yz,  0.0,
            zx,  zy,  1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        );
        Transform::new(matrix)
    }

    /// World to eye transform of an observer at `from` looking at `to`.
    /// Fails if `up` is parallel to the view direction or `from == to`.
    pub fn view(
        from: &WorldPoint,
        to: &WorldPoint,
        up: &WorldVector,
    ) -> Result<Transform, GeometryError> {
        let matrix = Isometry3::look_at_rh(from, to, up).to_homogeneous();
        if matrix.iter().any(|x| !x.is_finite()) {
            return Err(GeometryError::NonInvertible(matrix));
        }
        Transform::new(matrix)
    }

    /// Composition that applies `self` first and `next` second.
    pub fn then(&self, next: &Transform) -> Transform {
        Transform {
            matrix: next.matrix * self.matrix,
            inverse: self.inverse * next.inverse,
            normal_matrix: next.normal_matrix * self.normal_matrix,
        }
    }

    pub fn matrix(&self) -> &WorldMatrix {
        &self.matrix
    }

    pub fn inverse(&self) -> &WorldMatrix {
        &self.inverse
    }

    pub fn normal_matrix(&self) -> &Matrix3<FloatType> {
        &self.normal_matrix
    }
}

impl Default for Transform {
    fn default() -> Self {
        Transform::identity()
    }
}

/// Matrix product, the right hand side gets applied first.
impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        rhs.then(&self)
    }
}

impl Mul<&Transform> for &Transform {
    type Output = Transform;

    fn mul(self, rhs: &Transform) -> Transform {
        rhs.then(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::test::{assert_point_eq, assert_vector_eq};
    use assert2::{assert, let_assert};
    use std::f64::consts::{FRAC_1_SQRT_2, FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn translation_moves_points() {
        let t = Transform::translation(5.0, -3.0, 2.0);
        assert!(t.matrix().transform_point(&WorldPoint::new(-3.0, 4.0, 5.0)) == WorldPoint::new(2.0, 1.0, 7.0));
        assert!(t.inverse().transform_point(&WorldPoint::new(-3.0, 4.0, 5.0)) == WorldPoint::new(-8.0, 7.0, 3.0));
    }

    #[test]
    fn translation_does_not_affect_vectors() {
        let t = Transform::translation(5.0, -3.0, 2.0);
        let v = WorldVector::new(-3.0, 4.0, 5.0);
        assert!(t.matrix().transform_vector(&v) == v);
    }

    #[test]
    fn reflection_is_negative_scaling() {
        let t = Transform::scaling(-1.0, 1.0, 1.0).unwrap();
        assert!(t.matrix().transform_point(&WorldPoint::new(2.0, 3.0, 4.0)) == WorldPoint::new(-2.0, 3.0, 4.0));
    }

    #[test]
    fn zero_scaling_is_rejected() {
        let_assert!(Err(GeometryError::NonInvertible(_)) = Transform::scaling(1.0, 0.0, 1.0));
    }

    #[test]
    fn singular_matrix_is_rejected() {
        let_assert!(Err(GeometryError::NonInvertible(_)) = Transform::new(WorldMatrix::zeros()));
    }

    #[test]
    fn rotations_around_axes() {
        let x = Transform::rotation_x(FRAC_PI_4);
        assert_point_eq(
            &x.matrix().transform_point(&WorldPoint::new(0.0, 1.0, 0.0)),
            &WorldPoint::new(0.0, FRAC_1_SQRT_2, FRAC_1_SQRT_2),
        );
        assert_point_eq(
            &x.inverse().transform_point(&WorldPoint::new(0.0, 1.0, 0.0)),
            &WorldPoint::new(0.0, FRAC_1_SQRT_2, -FRAC_1_SQRT_2),
        );

        let y = Transform::rotation_y(FRAC_PI_2);
        assert_point_eq(
            &y.matrix().transform_point(&WorldPoint::new(0.0, 0.0, 1.0)),
            &WorldPoint::new(1.0, 0.0, 0.0),
        );

        let z = Transform::rotation_z(FRAC_PI_2);
        assert_point_eq(
            &z.matrix().transform_point(&WorldPoint::new(0.0, 1.0, 0.0)),
            &WorldPoint::new(-1.0, 0.0, 0.0),
        );
    }

    #[test]
    fn shearing_moves_x_in_proportion_to_y() {
        let t = Transform::shearing(1.0, 0.0, 0.0, 0.0, 0.0, 0.0).unwrap();
        assert!(t.matrix().transform_point(&WorldPoint::new(2.0, 3.0, 4.0)) == WorldPoint::new(5.0, 3.0, 4.0));
    }

    #[test]
    fn chained_transforms_apply_right_to_left() {
        let p = WorldPoint::new(1.0, 0.0, 1.0);
        let a = Transform::rotation_x(FRAC_PI_2);
        let b = Transform::scaling(5.0, 5.0, 5.0).unwrap();
        let c = Transform::translation(10.0, 5.0, 7.0);

        let chained = c * b * a;
        assert_point_eq(&chained.matrix().transform_point(&p), &WorldPoint::new(15.0, 0.0, 7.0));
        assert_point_eq(&chained.inverse().transform_point(&WorldPoint::new(15.0, 0.0, 7.0)), &p);
    }

    #[test]
    fn cached_normal_matrix_matches() {
        let t = Transform::translation(1.0, 2.0, 3.0)
            * Transform::rotation_y(0.3)
            * Transform::scaling(1.0, 2.0, 3.0).unwrap();
        let expected = t.matrix().try_inverse().unwrap().transpose().fixed_view::<3, 3>(0, 0).into_owned();
        assert!((t.normal_matrix() - expected).amax() < 1e-12);
    }

    #[test]
    fn normals_ignore_translation() {
        let t = Transform::translation(0.0, 1.0, 0.0);
        let n = WorldVector::new(0.0, 0.70711, -0.70711);
        assert!(t.normal_matrix() * n == n);
    }

    #[test]
    fn default_view_is_identity() {
        let t = Transform::view(
            &WorldPoint::new(0.0, 0.0, 0.0),
            &WorldPoint::new(0.0, 0.0, -1.0),
            &WorldVector::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((t.matrix() - WorldMatrix::identity()).amax() < 1e-12);
    }

    #[test]
    fn view_looking_in_positive_z() {
        let t = Transform::view(
            &WorldPoint::new(0.0, 0.0, 0.0),
            &WorldPoint::new(0.0, 0.0, 1.0),
            &WorldVector::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        let expected = WorldMatrix::new_nonuniform_scaling(&WorldVector::new(-1.0, 1.0, -1.0));
        assert!((t.matrix() - expected).amax() < 1e-12);
    }

    #[test]
    fn view_moves_the_world() {
        let t = Transform::view(
            &WorldPoint::new(0.0, 0.0, 8.0),
            &WorldPoint::new(0.0, 0.0, 0.0),
            &WorldVector::new(0.0, 1.0, 0.0),
        )
        .unwrap();
        assert_vector_eq(
            &(t.matrix().transform_point(&WorldPoint::origin()) - WorldPoint::origin()),
            &WorldVector::new(0.0, 0.0, -8.0),
        );
    }
}
