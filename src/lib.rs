mod camera;
mod color;
pub mod demos;
pub mod geometry;
mod renderer;
pub mod scene;
mod util;

pub use crate::renderer::{RenderProgress, RenderSettings, render};
pub use camera::Camera;
pub use color::Color;
pub use scene::World;
pub use util::Stats;
