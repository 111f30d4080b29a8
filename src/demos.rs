//! Ready made scenes, used by the CLI and the benchmark.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_3, FRAC_PI_4, FRAC_PI_6};

use crate::{
    Camera,
    color::Color,
    geometry::{FloatType, Transform, WorldPoint, WorldVector},
    scene::{
        Cone, Cylinder, Material, MaterialIdx, Pattern, PatternKind, Plane, PointLight,
        SceneError, ShapeIdx, Sphere, World,
    },
};

/// A world together with the viewpoint it is meant to be seen from.
#[derive(Clone, Debug)]
pub struct Demo {
    pub world: World,
    pub view: Transform,
    pub field_of_view: FloatType,
}

impl Demo {
    pub fn camera(&self, hsize: u32, vsize: u32) -> Camera {
        Camera::builder()
            .hsize(hsize)
            .vsize(vsize)
            .field_of_view(self.field_of_view)
            .transform(self.view.clone())
            .build()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DemoKind {
    Spheres,
    Hexagons,
    Glass,
    Conics,
}

impl DemoKind {
    pub fn build(self) -> Result<Demo, SceneError> {
        match self {
            DemoKind::Spheres => spheres(),
            DemoKind::Hexagons => hexagons(),
            DemoKind::Glass => glass(),
            DemoKind::Conics => conics(),
        }
    }
}

fn standard_view() -> Result<Transform, SceneError> {
    Ok(Transform::view(
        &WorldPoint::new(0.0, 1.5, -5.0),
        &WorldPoint::new(0.0, 1.0, 0.0),
        &WorldVector::new(0.0, 1.0, 0.0),
    )?)
}

fn demo(world: World) -> Result<Demo, SceneError> {
    Ok(Demo {
        world,
        view: standard_view()?,
        field_of_view: FRAC_PI_3,
    })
}

fn checker_floor(world: &mut World, a: Color, b: Color, reflective: FloatType) -> Result<ShapeIdx, SceneError> {
    let floor = world.add_material(
        Material::builder()
            .pattern(Pattern::new(PatternKind::Checker(a, b)))
            .specular(0.0)
            .reflective(reflective)
            .build(),
    );
    world.add_object(Plane, Transform::identity(), Some(floor))
}

/// Three matte spheres in a room made of flattened spheres.
pub fn spheres() -> Result<Demo, SceneError> {
    let mut world = World::new();
    world.light = Some(PointLight::new(WorldPoint::new(-10.0, 10.0, -10.0), Color::WHITE));

    let wall = world.add_material(
        Material::builder()
            .color(Color::new(1.0, 0.9, 0.9))
            .specular(0.0)
            .build(),
    );
    let flat = Transform::scaling(10.0, 0.01, 10.0)?;
    world.add_object(Sphere, flat.clone(), Some(wall))?;
    for angle in [-FRAC_PI_4, FRAC_PI_4] {
        let t = Transform::translation(0.0, 0.0, 5.0)
            * Transform::rotation_y(angle)
            * Transform::rotation_x(FRAC_PI_2)
            * flat.clone();
        world.add_object(Sphere, t, Some(wall))?;
    }

    let balls = [
        (Transform::translation(-0.5, 1.0, 0.5), Color::new(0.1, 1.0, 0.5)),
        (
            Transform::translation(1.5, 0.5, -0.5) * Transform::scaling(0.5, 0.5, 0.5)?,
            Color::new(0.5, 1.0, 0.1),
        ),
        (
            Transform::translation(-1.5, 0.33, -0.75) * Transform::scaling(0.33, 0.33, 0.33)?,
            Color::new(1.0, 0.8, 0.1),
        ),
    ];
    for (transform, color) in balls {
        let m = world.add_material(
            Material::builder()
                .color(color)
                .diffuse(0.7)
                .specular(0.3)
                .build(),
        );
        world.add_object(Sphere, transform, Some(m))?;
    }

    demo(world)
}

/// Hexagon made of six groups, each with a sphere corner and a cylinder edge.
fn hexagon(world: &mut World, transform: Transform, material: MaterialIdx) -> Result<ShapeIdx, SceneError> {
    let hex = world.add_group(transform);

    for n in 0..6 {
        let side = world.add_group(Transform::rotation_y(n as FloatType * FRAC_PI_3));

        let corner = world.add_shape(
            Sphere,
            Transform::translation(0.0, 0.0, -1.0) * Transform::scaling(0.25, 0.25, 0.25)?,
            None,
        )?;
        let edge = world.add_shape(
            Cylinder::new(0.0, 1.0, false),
            Transform::translation(0.0, 0.0, -1.0)
                * Transform::rotation_y(-FRAC_PI_6)
                * Transform::rotation_z(-FRAC_PI_2)
                * Transform::scaling(0.25, 1.0, 0.25)?,
            None,
        )?;

        world.add_child(side, corner)?;
        world.add_child(side, edge)?;
        world.add_child(hex, side)?;
    }

    world.set_group_material(hex, material)?;
    world.add_root(hex)?;
    Ok(hex)
}

/// Three hexagons above a reflective checkered floor.
pub fn hexagons() -> Result<Demo, SceneError> {
    let mut world = World::new();
    world.light = Some(PointLight::new(WorldPoint::new(10.0, 10.0, -10.0), Color::WHITE));
    checker_floor(&mut world, Color::WHITE, Color::BLACK, 0.5)?;

    let red = world.add_material(Material::builder().color(Color::new(0.8, 0.1, 0.1)).build());
    hexagon(
        &mut world,
        Transform::translation(-0.5, 1.0, 0.5) * Transform::rotation_y(FRAC_PI_6) * Transform::rotation_z(FRAC_PI_4),
        red,
    )?;

    let blue = world.add_material(
        Material::builder()
            .color(Color::new(0.0, 0.0, 0.7))
            .specular(1.0)
            .diffuse(0.0)
            .refractive_index(1.5)
            .build(),
    );
    hexagon(
        &mut world,
        Transform::translation(1.5, 0.5, -0.5)
            * Transform::rotation_y(-FRAC_PI_6)
            * Transform::rotation_z(FRAC_PI_4)
            * Transform::scaling(0.5, 0.5, 0.5)?,
        blue,
    )?;

    let green = world.add_material(
        Material::builder()
            .color(Color::new(0.0, 0.4, 0.0))
            .specular(1.0)
            .diffuse(0.0)
            .refractive_index(1.5)
            .build(),
    );
    hexagon(
        &mut world,
        Transform::translation(-1.5, 0.33, -0.75) * Transform::scaling(0.33, 0.33, 0.33)?,
        green,
    )?;

    demo(world)
}

/// Reflective and refractive spheres in front of a row of matte ones.
pub fn glass() -> Result<Demo, SceneError> {
    let mut world = World::new();
    world.light = Some(PointLight::new(WorldPoint::new(-10.0, 10.0, -10.0), Color::WHITE));
    checker_floor(&mut world, Color::new(1.0, 0.9, 0.9), Color::new(0.0, 0.1, 0.1), 0.4)?;

    let matte = world.add_material(
        Material::builder()
            .color(Color::new(1.0, 0.3, 0.2))
            .specular(0.4)
            .shininess(5.0)
            .build(),
    );
    for (x, z) in [(6.0, 4.0), (2.0, 3.0), (-1.0, 2.0)] {
        world.add_object(Sphere, Transform::translation(x, 1.0, z), Some(matte))?;
    }

    let blue = world.add_material(
        Material::builder()
            .color(Color::new(0.0, 0.0, 0.2))
            .ambient(0.0)
            .diffuse(0.4)
            .specular(0.9)
            .shininess(300.0)
            .reflective(0.9)
            .transparency(0.9)
            .refractive_index(1.5)
            .build(),
    );
    world.add_object(
        Sphere,
        Transform::translation(0.6, 0.7, -0.6) * Transform::scaling(0.7, 0.7, 0.7)?,
        Some(blue),
    )?;

    let green = world.add_material(
        Material::builder()
            .color(Color::new(0.0, 0.2, 0.0))
            .ambient(0.0)
            .diffuse(0.4)
            .specular(0.9)
            .shininess(300.0)
            .reflective(0.9)
            .transparency(0.3)
            .refractive_index(3.5)
            .build(),
    );
    world.add_object(
        Sphere,
        Transform::translation(-0.7, 0.5, -0.8) * Transform::scaling(0.5, 0.5, 0.5)?,
        Some(green),
    )?;

    demo(world)
}

/// Truncated cylinders and a cone on a checkered floor.
pub fn conics() -> Result<Demo, SceneError> {
    let mut world = World::new();
    world.light = Some(PointLight::new(WorldPoint::new(10.0, 10.0, -10.0), Color::WHITE));
    checker_floor(&mut world, Color::WHITE, Color::BLACK, 0.3)?;

    let red = world.add_material(Material::builder().color(Color::new(0.8, 0.1, 0.1)).build());
    world.add_object(
        Cylinder::new(-1.0, 1.0, true),
        Transform::translation(-0.5, 1.0, 0.5) * Transform::rotation_z(FRAC_PI_6),
        Some(red),
    )?;

    let blue = world.add_material(
        Material::builder()
            .color(Color::new(0.0, 0.0, 0.4))
            .diffuse(0.0)
            .specular(1.0)
            .reflective(0.5)
            .refractive_index(1.5)
            .build(),
    );
    world.add_object(
        Cone::new(-1.0, 1.0, true),
        Transform::translation(1.5, 0.5, -0.5)
            * Transform::rotation_y(-FRAC_PI_6)
            * Transform::scaling(0.5, 0.5, 0.5)?,
        Some(blue),
    )?;

    let green = world.add_material(
        Material::builder()
            .color(Color::new(0.0, 0.4, 0.0))
            .diffuse(0.0)
            .specular(1.0)
            .refractive_index(1.5)
            .build(),
    );
    world.add_object(
        Cylinder::new(-1.0, 1.0, true),
        Transform::translation(-1.5, 0.33, -0.75) * Transform::scaling(0.33, 0.33, 0.33)?,
        Some(green),
    )?;

    demo(world)
}
