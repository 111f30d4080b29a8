use index_vec::IndexVec;
use log::info;

use crate::color::Color;
use crate::geometry::{Ray, Transform, WorldPoint};
use crate::scene::{
    Computations, DEFAULT_MATERIAL, Intersection, Intersections, Material, MaterialIdx,
    PointLight, Primitive, SceneError, ShapeIdx, Shapes, Sphere,
};
use crate::util::Stats;

/// Scene description: shapes, the materials they reference and a light.
///
/// Scene building takes `&mut self`; rendering only ever reads the world, so it can be
/// shared between render threads.
#[derive(Clone, Debug)]
pub struct World {
    shapes: Shapes,
    materials: IndexVec<MaterialIdx, Material>,
    /// Top level shapes, every one of them a root of the shape graph.
    objects: Vec<ShapeIdx>,
    pub light: Option<PointLight>,
}

impl World {
    /// Empty world without any light.
    pub fn new() -> World {
        World {
            shapes: Shapes::new(),
            materials: IndexVec::new(),
            objects: Vec::new(),
            light: None,
        }
    }

    pub fn shapes(&self) -> &Shapes {
        &self.shapes
    }

    pub fn objects(&self) -> &[ShapeIdx] {
        &self.objects
    }

    pub fn add_material(&mut self, material: Material) -> MaterialIdx {
        self.materials.push(material)
    }

    pub fn material(&self, idx: MaterialIdx) -> Result<&Material, SceneError> {
        self.materials.get(idx).ok_or(SceneError::UnknownMaterial(idx))
    }

    /// Changes are seen by every shape using this material.
    pub fn material_mut(&mut self, idx: MaterialIdx) -> Result<&mut Material, SceneError> {
        self.materials
            .get_mut(idx)
            .ok_or(SceneError::UnknownMaterial(idx))
    }

    /// Effective material of a shape, after inheritance from its ancestors.
    pub fn material_of(&self, shape: ShapeIdx) -> &Material {
        self.shapes
            .material(shape)
            .and_then(|idx| self.materials.get(idx))
            .unwrap_or(&DEFAULT_MATERIAL)
    }

    /// Adds an unattached primitive. It is not rendered until it becomes an object or
    /// a descendant of one.
    pub fn add_shape(
        &mut self,
        primitive: impl Into<Primitive>,
        transform: Transform,
        material: Option<MaterialIdx>,
    ) -> Result<ShapeIdx, SceneError> {
        self.check_material(material)?;
        let idx = self.shapes.add(primitive, transform);
        self.shapes.set_material(idx, material)?;
        Ok(idx)
    }

    /// Adds an unattached empty group.
    pub fn add_group(&mut self, transform: Transform) -> ShapeIdx {
        self.shapes.add_group(transform)
    }

    /// Adds a primitive directly as a top level object.
    pub fn add_object(
        &mut self,
        primitive: impl Into<Primitive>,
        transform: Transform,
        material: Option<MaterialIdx>,
    ) -> Result<ShapeIdx, SceneError> {
        let idx = self.add_shape(primitive, transform, material)?;
        self.objects.push(idx);
        Ok(idx)
    }

    /// Makes an unattached shape (typically a group) a top level object.
    pub fn add_root(&mut self, shape: ShapeIdx) -> Result<(), SceneError> {
        if let Some(parent) = self.shapes.get(shape)?.parent() {
            return Err(SceneError::AlreadyAttached {
                child: shape,
                parent,
            });
        }
        if self.objects.contains(&shape) {
            return Err(SceneError::AlreadyInWorld(shape));
        }
        self.objects.push(shape);
        Ok(())
    }

    pub fn add_child(&mut self, group: ShapeIdx, child: ShapeIdx) -> Result<(), SceneError> {
        if self.objects.contains(&child) {
            return Err(SceneError::AlreadyInWorld(child));
        }
        self.shapes.add_child(group, child)
    }

    pub fn set_transform(&mut self, shape: ShapeIdx, transform: Transform) -> Result<(), SceneError> {
        self.shapes.set_transform(shape, transform)
    }

    pub fn set_material(
        &mut self,
        shape: ShapeIdx,
        material: Option<MaterialIdx>,
    ) -> Result<(), SceneError> {
        self.check_material(material)?;
        self.shapes.set_material(shape, material)
    }

    /// Assigns `material` to the group and all of its descendants, so that they share it.
    pub fn set_group_material(
        &mut self,
        group: ShapeIdx,
        material: MaterialIdx,
    ) -> Result<(), SceneError> {
        self.check_material(Some(material))?;
        if !self.shapes.get(group)?.is_group() {
            return Err(SceneError::NotAGroup(group));
        }
        let subtree: Vec<_> = self.shapes.subtree(group).collect();
        for idx in subtree {
            self.shapes.set_material(idx, Some(material))?;
        }
        Ok(())
    }

    fn check_material(&self, material: Option<MaterialIdx>) -> Result<(), SceneError> {
        match material {
            Some(idx) => self.material(idx).map(|_| ()),
            None => Ok(()),
        }
    }

    /// All intersections of the ray with every object, sorted by `t`.
    pub fn intersect(&self, ray: &Ray) -> Intersections {
        let mut hits: Vec<Intersection> = Vec::new();
        for &object in &self.objects {
            self.shapes.intersect_into(object, ray, &mut hits);
        }
        Intersections::new(hits)
    }

    /// Color seen along `ray`; black if nothing is hit.
    /// `remaining` bounds the number of reflection and refraction bounces.
    pub fn color_at(&self, ray: &Ray, remaining: u32) -> Color {
        let xs = self.intersect(ray);
        match xs.hit() {
            Some(hit) => {
                let comps = Computations::prepare(hit, ray, &xs, self);
                self.shade_hit(&comps, remaining)
            }
            None => Color::BLACK,
        }
    }

    pub fn shade_hit(&self, comps: &Computations, remaining: u32) -> Color {
        let material = self.material_of(comps.shape);

        let surface = match &self.light {
            Some(light) => material.lighting(
                material.color_at(&self.shapes, comps.shape, &comps.over_point),
                light,
                &comps.over_point,
                &comps.eyev,
                &comps.normalv,
                self.is_shadowed(&comps.over_point),
            ),
            None => Color::BLACK,
        };

        let reflected = self.reflected_color(comps, remaining);
        let refracted = self.refracted_color(comps, remaining);

        if material.reflective > 0.0 && material.transparency > 0.0 {
            let reflectance = comps.schlick();
            surface + reflected * reflectance + refracted * (1.0 - reflectance)
        } else {
            surface + reflected + refracted
        }
    }

    pub fn reflected_color(&self, comps: &Computations, remaining: u32) -> Color {
        let reflective = self.material_of(comps.shape).reflective;
        if remaining == 0 || reflective == 0.0 {
            return Color::BLACK;
        }

        let reflect_ray = Ray::new(comps.over_point, comps.reflectv);
        self.color_at(&reflect_ray, remaining - 1) * reflective
    }

    pub fn refracted_color(&self, comps: &Computations, remaining: u32) -> Color {
        let transparency = self.material_of(comps.shape).transparency;
        if remaining == 0 || transparency == 0.0 {
            return Color::BLACK;
        }

        // Snell's law
        let n_ratio = comps.n1 / comps.n2;
        let cos_i = comps.eyev.dot(&comps.normalv);
        let sin2_t = n_ratio * n_ratio * (1.0 - cos_i * cos_i);
        if sin2_t > 1.0 {
            // Total internal reflection
            return Color::BLACK;
        }

        let cos_t = (1.0 - sin2_t).sqrt();
        let direction = comps.normalv * (n_ratio * cos_i - cos_t) - comps.eyev * n_ratio;
        let refract_ray = Ray::new(comps.under_point, direction);

        self.color_at(&refract_ray, remaining - 1) * transparency
    }

    /// Whether any object lies between `point` and the light.
    /// Without a light nothing is shadowed.
    pub fn is_shadowed(&self, point: &WorldPoint) -> bool {
        let Some(light) = &self.light else {
            return false;
        };

        let to_light = light.position - point;
        let distance = to_light.norm();
        let ray = Ray::new(*point, to_light / distance);

        self.intersect(&ray).hit().is_some_and(|hit| hit.t < distance)
    }

    /// Logs group nesting and fan-out statistics of the scene.
    pub fn log_statistics(&self) {
        let mut depth = Stats::default();
        let mut children = Stats::default();
        let mut primitives = 0;

        for &object in &self.objects {
            for idx in self.shapes.subtree(object) {
                let shape = &self.shapes[idx];
                if shape.is_group() {
                    children.add_sample(shape.children().len());
                } else {
                    primitives += 1;
                    depth.add_sample(self.shapes.depth(idx));
                }
            }
        }

        info!(
            "Scene has {} objects, {} primitives, {} materials",
            self.objects.len(),
            primitives,
            self.materials.len()
        );
        if depth.count > 0 {
            info!("Primitive nesting depth: {depth}");
        }
        if children.count > 0 {
            info!("Children per group: {children}");
        }
    }
}

impl Default for World {
    /// World used throughout the tests: a light at (-10, 10, -10), a green-ish unit sphere
    /// and a white sphere of radius 0.5 inside it, both centered at the origin.
    fn default() -> Self {
        default_world().expect("Default world only uses valid transforms and materials")
    }
}

fn default_world() -> Result<World, SceneError> {
    let mut world = World::new();
    world.light = Some(PointLight::new(
        WorldPoint::new(-10.0, 10.0, -10.0),
        Color::WHITE,
    ));

    let outer = world.add_material(
        Material::builder()
            .color(Color::new(0.8, 1.0, 0.6))
            .diffuse(0.7)
            .specular(0.2)
            .build(),
    );
    let inner = world.add_material(Material::default());

    world.add_object(Sphere, Transform::identity(), Some(outer))?;
    world.add_object(Sphere, Transform::scaling(0.5, 0.5, 0.5)?, Some(inner))?;

    Ok(world)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::{WorldVector, test::assert_point_eq};
    use crate::scene::{Cube, Intersection, Plane};
    use assert2::{assert, let_assert};
    use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

    fn ray(o: [f64; 3], d: [f64; 3]) -> Ray {
        Ray::new(o.into(), d.into())
    }

    fn assert_color(actual: Color, expected: Color) {
        assert!((actual - expected).r().abs() < 1e-4, "{actual:?} != {expected:?}");
        assert!((actual - expected).g().abs() < 1e-4, "{actual:?} != {expected:?}");
        assert!((actual - expected).b().abs() < 1e-4, "{actual:?} != {expected:?}");
    }

    fn material_of_object(world: &mut World, object: usize) -> &mut Material {
        let shape = world.objects()[object];
        let_assert!(Some(idx) = world.shapes().material(shape));
        world.material_mut(idx).unwrap()
    }

    #[test]
    fn default_world() {
        let w = World::default();
        let_assert!(Some(light) = w.light);
        assert!(light.position == WorldPoint::new(-10.0, 10.0, -10.0));
        assert!(w.objects().len() == 2);
        assert!(w.material_of(w.objects()[0]).color == Color::new(0.8, 1.0, 0.6));
        assert!(w.material_of(w.objects()[1]) == &Material::default());
    }

    #[test]
    fn intersect_default_world() {
        let w = World::default();
        let xs = w.intersect(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]));
        let ts: Vec<_> = xs.iter().map(|i| i.t).collect();
        assert!(ts == vec![4.0, 4.5, 5.5, 6.0]);
    }

    #[test]
    fn shading_an_intersection() {
        let w = World::default();
        let r = ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]);
        let xs = Intersections::new(vec![Intersection::new(4.0, w.objects()[0])]);
        let comps = Computations::prepare(&xs[0], &r, &xs, &w);
        assert_color(w.shade_hit(&comps, 5), Color::new(0.38066, 0.47583, 0.2855));
    }

    #[test]
    fn shading_from_inside() {
        let mut w = World::default();
        w.light = Some(PointLight::new(WorldPoint::new(0.0, 0.25, 0.0), Color::WHITE));
        let r = ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let xs = Intersections::new(vec![Intersection::new(0.5, w.objects()[1])]);
        let comps = Computations::prepare(&xs[0], &r, &xs, &w);
        assert_color(w.shade_hit(&comps, 5), Color::new(0.90498, 0.90498, 0.90498));
    }

    #[test]
    fn color_when_ray_misses() {
        let w = World::default();
        assert!(w.color_at(&ray([0.0, 0.0, -5.0], [0.0, 1.0, 0.0]), 5) == Color::BLACK);
    }

    #[test]
    fn color_when_ray_hits() {
        let w = World::default();
        assert_color(
            w.color_at(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]), 5),
            Color::new(0.38066, 0.47583, 0.2855),
        );
    }

    #[test]
    fn color_with_intersection_behind_ray() {
        let mut w = World::default();
        material_of_object(&mut w, 0).ambient = 1.0;
        material_of_object(&mut w, 1).ambient = 1.0;
        let inner_color = w.material_of(w.objects()[1]).color;
        assert!(w.color_at(&ray([0.0, 0.0, 0.75], [0.0, 0.0, -1.0]), 5) == inner_color);
    }

    #[test]
    fn shadows() {
        let w = World::default();
        assert!(!w.is_shadowed(&WorldPoint::new(0.0, 10.0, 0.0)), "nothing collinear");
        assert!(w.is_shadowed(&WorldPoint::new(10.0, -10.0, 10.0)), "object between point and light");
        assert!(!w.is_shadowed(&WorldPoint::new(-20.0, 20.0, -20.0)), "object behind light");
        assert!(!w.is_shadowed(&WorldPoint::new(-2.0, 2.0, -2.0)), "object behind point");
    }

    #[test]
    fn no_light_no_shadow() {
        let mut w = World::default();
        w.light = None;
        assert!(!w.is_shadowed(&WorldPoint::new(10.0, -10.0, 10.0)));
        assert!(w.color_at(&ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]), 5) == Color::BLACK);
    }

    #[test]
    fn shade_hit_in_shadow() {
        let mut w = World::new();
        w.light = Some(PointLight::new(WorldPoint::new(0.0, 0.0, -10.0), Color::WHITE));
        w.add_object(Sphere, Transform::identity(), None).unwrap();
        let s2 = w.add_object(Sphere, Transform::translation(0.0, 0.0, 10.0), None).unwrap();

        let r = ray([0.0, 0.0, 5.0], [0.0, 0.0, 1.0]);
        let xs = Intersections::new(vec![Intersection::new(4.0, s2)]);
        let comps = Computations::prepare(&xs[0], &r, &xs, &w);
        assert_color(w.shade_hit(&comps, 5), Color::new(0.1, 0.1, 0.1));
    }

    #[test]
    fn reflected_color_of_nonreflective_material() {
        let mut w = World::default();
        material_of_object(&mut w, 1).ambient = 1.0;
        let r = ray([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        let xs = Intersections::new(vec![Intersection::new(1.0, w.objects()[1])]);
        let comps = Computations::prepare(&xs[0], &r, &xs, &w);
        assert!(w.reflected_color(&comps, 5) == Color::BLACK);
    }

    fn add_reflective_plane(w: &mut World) -> ShapeIdx {
        let m = w.add_material(Material::builder().reflective(0.5).build());
        w.add_object(Plane, Transform::translation(0.0, -1.0, 0.0), Some(m)).unwrap()
    }

    fn ray_towards_plane() -> Ray {
        ray([0.0, 0.0, -3.0], [0.0, -FRAC_1_SQRT_2, FRAC_1_SQRT_2])
    }

    #[test]
    fn reflected_color_of_reflective_material() {
        let mut w = World::default();
        let plane = add_reflective_plane(&mut w);
        let r = ray_towards_plane();
        let xs = Intersections::new(vec![Intersection::new(SQRT_2, plane)]);
        let comps = Computations::prepare(&xs[0], &r, &xs, &w);

        assert_color(w.reflected_color(&comps, 5), Color::new(0.19032, 0.2379, 0.14274));
        assert_color(w.shade_hit(&comps, 5), Color::new(0.87677, 0.92436, 0.82918));
        assert!(w.reflected_color(&comps, 0) == Color::BLACK);
    }

    #[test]
    fn mutually_reflective_surfaces_terminate() {
        let mut w = World::new();
        w.light = Some(PointLight::new(WorldPoint::origin(), Color::WHITE));
        let m = w.add_material(Material::builder().reflective(1.0).build());
        w.add_object(Plane, Transform::translation(0.0, -1.0, 0.0), Some(m)).unwrap();
        w.add_object(Plane, Transform::translation(0.0, 1.0, 0.0), Some(m)).unwrap();

        let c = w.color_at(&ray([0.0, 0.0, 0.0], [0.0, 1.0, 0.0]), 5);
        assert!(c.r().is_finite());
    }

    #[test]
    fn refracted_color_of_opaque_surface() {
        let w = World::default();
        let r = ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]);
        let xs = w.intersect(&r);
        let comps = Computations::prepare(&xs[0], &r, &xs, &w);
        assert!(w.refracted_color(&comps, 5) == Color::BLACK);
    }

    fn make_outer_glass(w: &mut World) {
        let m = material_of_object(w, 0);
        m.transparency = 1.0;
        m.refractive_index = 1.5;
    }

    #[test]
    fn refracted_color_at_maximum_depth() {
        let mut w = World::default();
        make_outer_glass(&mut w);
        let r = ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]);
        let xs = w.intersect(&r);
        let comps = Computations::prepare(&xs[0], &r, &xs, &w);
        assert!(w.refracted_color(&comps, 0) == Color::BLACK);
    }

    #[test]
    fn refracted_color_under_total_internal_reflection() {
        let mut w = World::default();
        make_outer_glass(&mut w);
        let outer = w.objects()[0];
        let r = ray([0.0, 0.0, FRAC_1_SQRT_2], [0.0, 1.0, 0.0]);
        let xs = Intersections::new(vec![
            Intersection::new(-FRAC_1_SQRT_2, outer),
            Intersection::new(FRAC_1_SQRT_2, outer),
        ]);
        let comps = Computations::prepare(&xs[1], &r, &xs, &w);
        assert!(w.refracted_color(&comps, 5) == Color::BLACK);
    }

    fn add_glass_floor_and_ball(w: &mut World, reflective: f64) {
        let floor = w.add_material(
            Material::builder()
                .transparency(0.5)
                .reflective(reflective)
                .refractive_index(1.5)
                .build(),
        );
        w.add_object(Plane, Transform::translation(0.0, -1.0, 0.0), Some(floor)).unwrap();

        let ball = w.add_material(Material::builder().color(Color::new(1.0, 0.0, 0.0)).ambient(0.5).build());
        w.add_object(Sphere, Transform::translation(0.0, -3.5, -0.5), Some(ball)).unwrap();
    }

    #[test]
    fn shade_hit_with_transparent_material() {
        let mut w = World::default();
        add_glass_floor_and_ball(&mut w, 0.0);
        assert_color(w.color_at(&ray_towards_plane(), 5), Color::new(0.93642, 0.68642, 0.68642));
    }

    #[test]
    fn shade_hit_with_reflective_transparent_material() {
        let mut w = World::default();
        add_glass_floor_and_ball(&mut w, 0.5);
        assert_color(w.color_at(&ray_towards_plane(), 5), Color::new(0.93391, 0.69643, 0.69243));
    }

    #[test]
    fn group_material_is_shared() {
        let mut w = World::new();
        let g = w.add_group(Transform::identity());
        let a = w.add_shape(Sphere, Transform::identity(), None).unwrap();
        let b = w.add_shape(Cube, Transform::translation(3.0, 0.0, 0.0), None).unwrap();
        w.add_child(g, a).unwrap();
        w.add_child(g, b).unwrap();
        w.add_root(g).unwrap();

        let m = w.add_material(Material::builder().color(Color::new(1.0, 0.0, 0.0)).build());
        w.set_group_material(g, m).unwrap();
        assert!(w.shapes()[a].own_material() == Some(m));
        assert!(w.shapes()[b].own_material() == Some(m));

        w.material_mut(m).unwrap().color = Color::new(0.0, 0.0, 1.0);
        assert!(w.material_of(a).color == Color::new(0.0, 0.0, 1.0));
        assert!(w.material_of(b).color == Color::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn unassigned_material_falls_back_to_default() {
        let mut w = World::new();
        let s = w.add_object(Sphere, Transform::identity(), None).unwrap();
        assert!(w.material_of(s) == &Material::default());
    }

    #[test]
    fn scene_building_errors() {
        let mut w = World::new();
        let s = w.add_object(Sphere, Transform::identity(), None).unwrap();
        let g = w.add_group(Transform::identity());

        let_assert!(Err(SceneError::AlreadyInWorld(_)) = w.add_child(g, s));
        let_assert!(Err(SceneError::AlreadyInWorld(_)) = w.add_root(s));
        let_assert!(Err(SceneError::UnknownMaterial(_)) = w.set_material(s, Some(MaterialIdx::from_usize(7))));
        let m = w.add_material(Material::default());
        let_assert!(Err(SceneError::NotAGroup(_)) = w.set_group_material(s, m));
    }

    #[test]
    fn rays_through_groups_reach_children() {
        let mut w = World::new();
        w.light = Some(PointLight::new(WorldPoint::new(-10.0, 10.0, -10.0), Color::WHITE));
        let g = w.add_group(Transform::translation(0.0, 0.0, 5.0));
        let s = w.add_shape(Sphere, Transform::identity(), None).unwrap();
        w.add_child(g, s).unwrap();
        w.add_root(g).unwrap();

        let r = ray([0.0, 0.0, -5.0], [0.0, 0.0, 1.0]);
        let xs = w.intersect(&r);
        let_assert!(Some(hit) = xs.hit());
        assert!(hit.shape == s);
        assert_point_eq(&r.position(hit.t), &WorldPoint::new(0.0, 0.0, 4.0));

        let comps = Computations::prepare(hit, &r, &xs, &w);
        assert!(comps.normalv == WorldVector::new(0.0, 0.0, -1.0));
    }
}
