mod intersection;
mod light;
mod material;
mod pattern;
pub mod primitives;
mod shapes;
mod world;

use thiserror::Error;

use crate::geometry::GeometryError;

pub use intersection::{Computations, Intersection, Intersections};
pub use light::PointLight;
pub use material::{DEFAULT_MATERIAL, Material, MaterialIdx};
pub use pattern::{Pattern, PatternKind};
pub use primitives::{Cone, Cube, Cylinder, Object, Plane, Sphere};
pub use shapes::{Primitive, Shape, ShapeIdx, ShapeKind, Shapes};
pub use world::World;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SceneError {
    #[error("Shape {0:?} is not a group")]
    NotAGroup(ShapeIdx),
    #[error("Shape {child:?} is already a child of {parent:?}")]
    AlreadyAttached { child: ShapeIdx, parent: ShapeIdx },
    #[error("Attaching {child:?} to {group:?} would create a cycle")]
    CycleDetected { group: ShapeIdx, child: ShapeIdx },
    #[error("Shape {0:?} is already a top level object")]
    AlreadyInWorld(ShapeIdx),
    #[error("No shape with index {0:?}")]
    UnknownShape(ShapeIdx),
    #[error("No material with index {0:?}")]
    UnknownMaterial(MaterialIdx),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
