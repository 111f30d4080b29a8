use std::sync::LazyLock;

use assert2::assert;
use bon::bon;

use crate::color::Color;
use crate::geometry::{FloatType, WorldPoint, WorldVector, reflect};
use crate::scene::{Pattern, PointLight, ShapeIdx, Shapes};

index_vec::define_index_type! {
    pub struct MaterialIdx = u32;
}

/// Material used by shapes that have none assigned, directly or through an ancestor.
pub static DEFAULT_MATERIAL: LazyLock<Material> = LazyLock::new(Material::default);

/// Phong surface parameters plus reflection and refraction properties.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub color: Color,
    pub ambient: FloatType,
    pub diffuse: FloatType,
    pub specular: FloatType,
    pub shininess: FloatType,
    /// 0 for a matte surface, 1 for a perfect mirror
    pub reflective: FloatType,
    /// 0 for an opaque surface, 1 for a fully transparent one
    pub transparency: FloatType,
    pub refractive_index: FloatType,
    /// Overrides `color` when present
    pub pattern: Option<Pattern>,
}

#[bon]
impl Material {
    #[builder]
    pub fn new(
        #[builder(default = Color::WHITE)] color: Color,
        #[builder(default = 0.1)] ambient: FloatType,
        #[builder(default = 0.9)] diffuse: FloatType,
        #[builder(default = 0.9)] specular: FloatType,
        #[builder(default = 200.0)] shininess: FloatType,
        #[builder(default = 0.0)] reflective: FloatType,
        #[builder(default = 0.0)] transparency: FloatType,
        #[builder(default = 1.0)] refractive_index: FloatType,
        pattern: Option<Pattern>,
    ) -> Self {
        assert!(ambient >= 0.0);
        assert!(diffuse >= 0.0);
        assert!(specular >= 0.0);
        assert!(shininess > 0.0);
        assert!((0.0..=1.0).contains(&reflective));
        assert!((0.0..=1.0).contains(&transparency));
        assert!(refractive_index > 0.0);

        Material {
            color,
            ambient,
            diffuse,
            specular,
            shininess,
            reflective,
            transparency,
            refractive_index,
            pattern,
        }
    }
}

impl Material {
    /// Surface color at a world space point of `shape`, before any lighting.
    pub fn color_at(&self, shapes: &Shapes, shape: ShapeIdx, world_point: &WorldPoint) -> Color {
        match &self.pattern {
            Some(pattern) => pattern.pattern_at_shape(shapes, shape, world_point),
            None => self.color,
        }
    }

    /// Phong illumination of a surface point with color `surface`.
    /// A point in shadow only receives the ambient term.
    pub fn lighting(
        &self,
        surface: Color,
        light: &PointLight,
        point: &WorldPoint,
        eyev: &WorldVector,
        normalv: &WorldVector,
        in_shadow: bool,
    ) -> Color {
        let effective_color = surface * light.intensity;
        let ambient = effective_color * self.ambient;
        if in_shadow {
            return ambient;
        }

        let lightv = (light.position - point).normalize();
        let light_dot_normal = lightv.dot(normalv);
        if light_dot_normal < 0.0 {
            // Light is behind the surface
            return ambient;
        }

        let diffuse = effective_color * (self.diffuse * light_dot_normal);

        let reflectv = reflect(&-lightv, normalv);
        let reflect_dot_eye = reflectv.dot(eyev);
        let specular = if reflect_dot_eye <= 0.0 {
            Color::BLACK
        } else {
            light.intensity * (self.specular * reflect_dot_eye.powf(self.shininess))
        };

        ambient + diffuse + specular
    }
}

impl Default for Material {
    fn default() -> Self {
        Material::builder().build()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::geometry::Transform;
    use crate::scene::{PatternKind, Sphere};
    use assert2::assert;
    use std::f64::consts::FRAC_1_SQRT_2;
    use test_case::test_case;

    #[test]
    fn default_material() {
        let m = Material::default();
        assert!(m.color == Color::WHITE);
        assert!(m.ambient == 0.1);
        assert!(m.diffuse == 0.9);
        assert!(m.specular == 0.9);
        assert!(m.shininess == 200.0);
        assert!(m.reflective == 0.0);
        assert!(m.transparency == 0.0);
        assert!(m.refractive_index == 1.0);
        assert!(m.pattern.is_none());
    }

    #[test]
    #[should_panic]
    fn reflective_out_of_range_is_rejected() {
        let _ = Material::builder().reflective(1.5).build();
    }

    #[test]
    #[should_panic]
    fn zero_refractive_index_is_rejected() {
        let _ = Material::builder().refractive_index(0.0).build();
    }

    #[test_case([0.0, 0.0, -1.0], [0.0, 0.0, -10.0], 1.9 ; "eye_between_light_and_surface")]
    #[test_case([0.0, FRAC_1_SQRT_2, -FRAC_1_SQRT_2], [0.0, 0.0, -10.0], 1.0 ; "eye_offset_45")]
    #[test_case([0.0, 0.0, -1.0], [0.0, 10.0, -10.0], 0.7364 ; "light_offset_45")]
    #[test_case([0.0, -FRAC_1_SQRT_2, -FRAC_1_SQRT_2], [0.0, 10.0, -10.0], 1.6364 ; "eye_in_reflection_path")]
    #[test_case([0.0, 0.0, -1.0], [0.0, 0.0, 10.0], 0.1 ; "light_behind_surface")]
    fn lighting(eyev: [f64; 3], light_position: [f64; 3], expected: f64) {
        let m = Material::default();
        let light = PointLight::new(light_position.into(), Color::WHITE);
        let result = m.lighting(
            m.color,
            &light,
            &WorldPoint::origin(),
            &eyev.into(),
            &WorldVector::new(0.0, 0.0, -1.0),
            false,
        );
        assert!(result.approx_eq(&Color::new(expected, expected, expected)), "{result:?}");
    }

    #[test]
    fn lighting_in_shadow() {
        let m = Material::default();
        let light = PointLight::new(WorldPoint::new(0.0, 0.0, -10.0), Color::WHITE);
        let result = m.lighting(
            m.color,
            &light,
            &WorldPoint::origin(),
            &WorldVector::new(0.0, 0.0, -1.0),
            &WorldVector::new(0.0, 0.0, -1.0),
            true,
        );
        assert!(result.approx_eq(&Color::new(0.1, 0.1, 0.1)));
    }

    #[test]
    fn lighting_with_pattern() {
        let m = Material::builder()
            .ambient(1.0)
            .diffuse(0.0)
            .specular(0.0)
            .pattern(Pattern::new(PatternKind::Stripe(Color::WHITE, Color::BLACK)))
            .build();
        let mut shapes = Shapes::new();
        let s = shapes.add(Sphere, Transform::identity());
        let light = PointLight::new(WorldPoint::new(0.0, 0.0, -10.0), Color::WHITE);
        let eyev = WorldVector::new(0.0, 0.0, -1.0);
        let normalv = WorldVector::new(0.0, 0.0, -1.0);

        let shade = |x: f64| {
            let point = WorldPoint::new(x, 0.0, 0.0);
            m.lighting(m.color_at(&shapes, s, &point), &light, &point, &eyev, &normalv, false)
        };
        assert!(shade(0.9) == Color::WHITE);
        assert!(shade(1.1) == Color::BLACK);
    }
}
