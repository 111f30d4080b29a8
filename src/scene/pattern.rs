use crate::color::Color;
use crate::geometry::{FloatType, Transform, WorldPoint};
use crate::scene::{ShapeIdx, Shapes};

/// Procedural color functions, each alternating or blending between two colors.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PatternKind {
    /// Alternates with the parity of floor(x).
    Stripe(Color, Color),
    /// Linear blend over the fractional part of x.
    Gradient(Color, Color),
    /// Concentric rings around the y axis.
    Ring(Color, Color),
    /// 3D checkerboard of unit cubes.
    Checker(Color, Color),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    /// Placement of the pattern relative to the object space of the shape.
    pub transform: Transform,
}

impl Pattern {
    pub fn new(kind: PatternKind) -> Pattern {
        Pattern {
            kind,
            transform: Transform::identity(),
        }
    }

    pub fn with_transform(kind: PatternKind, transform: Transform) -> Pattern {
        Pattern { kind, transform }
    }

    /// Color at a point given in pattern space.
    pub fn pattern_at(&self, point: &WorldPoint) -> Color {
        match self.kind {
            PatternKind::Stripe(a, b) => pick(point.x.floor(), a, b),
            PatternKind::Gradient(a, b) => a + (b - a) * (point.x - point.x.floor()),
            PatternKind::Ring(a, b) => pick(point.x.hypot(point.z).floor(), a, b),
            PatternKind::Checker(a, b) => {
                pick(point.x.floor() + point.y.floor() + point.z.floor(), a, b)
            }
        }
    }

    /// Color at a world space point on `shape`, going through the parent chain of the
    /// shape and then the pattern transform.
    pub fn pattern_at_shape(&self, shapes: &Shapes, shape: ShapeIdx, world_point: &WorldPoint) -> Color {
        let object_point = shapes.world_to_object(shape, world_point);
        let pattern_point = self.transform.inverse().transform_point(&object_point);
        self.pattern_at(&pattern_point)
    }
}

/// `a` for even integers, `b` for odd ones.
fn pick(value: FloatType, a: Color, b: Color) -> Color {
    if value.rem_euclid(2.0) == 0.0 { a } else { b }
}
