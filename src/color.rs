use std::{
    iter::Sum,
    ops::{Add, AddAssign, Mul, Sub},
};

use nalgebra::Vector3;

use crate::geometry::{EPSILON, FloatType};

/// Linear RGB color, components are nominally in [0, 1] but not clamped.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Color(Vector3<FloatType>);

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: FloatType, g: FloatType, b: FloatType) -> Color {
        Color(Vector3::new(r, g, b))
    }

    pub fn r(&self) -> FloatType {
        self.0.x
    }

    pub fn g(&self) -> FloatType {
        self.0.y
    }

    pub fn b(&self) -> FloatType {
        self.0.z
    }

    /// Component-wise equality within EPSILON.
    pub fn approx_eq(&self, other: &Color) -> bool {
        (self.0 - other.0).amax() < EPSILON
    }

    /// Converts to 8 bit sRGB-less pixel, clamping to [0, 1] first.
    pub fn to_rgb8(&self) -> image::Rgb<u8> {
        let channel = |c: FloatType| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        image::Rgb([channel(self.r()), channel(self.g()), channel(self.b())])
    }
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Color {
        Color(self.0 + rhs.0)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        self.0 += rhs.0;
    }
}

impl Sub for Color {
    type Output = Color;

    fn sub(self, rhs: Color) -> Color {
        Color(self.0 - rhs.0)
    }
}

/// Hadamard product, used for filtering light by a surface color.
impl Mul for Color {
    type Output = Color;

    fn mul(self, rhs: Color) -> Color {
        Color(self.0.component_mul(&rhs.0))
    }
}

impl Mul<FloatType> for Color {
    type Output = Color;

    fn mul(self, rhs: FloatType) -> Color {
        Color(self.0 * rhs)
    }
}

impl Sum for Color {
    fn sum<I: Iterator<Item = Color>>(iter: I) -> Color {
        iter.fold(Color::BLACK, Add::add)
    }
}
