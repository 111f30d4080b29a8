use crate::color::Color;
use crate::geometry::WorldPoint;

/// Point light source without falloff.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointLight {
    pub position: WorldPoint,
    pub intensity: Color,
}

impl PointLight {
    pub fn new(position: WorldPoint, intensity: Color) -> PointLight {
        PointLight {
            position,
            intensity,
        }
    }
}
