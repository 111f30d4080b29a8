use std::ops::Deref;

use ordered_float::OrderedFloat;

use crate::geometry::{EPSILON, FloatType, Ray, WorldPoint, WorldVector, reflect};
use crate::scene::{ShapeIdx, World};

/// Ray parameter paired with the primitive hit there.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    pub t: FloatType,
    pub shape: ShapeIdx,
}

impl Intersection {
    pub fn new(t: FloatType, shape: ShapeIdx) -> Intersection {
        Intersection { t, shape }
    }
}

/// Intersections of a single ray, sorted by ascending `t`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Intersections(Vec<Intersection>);

impl Intersections {
    /// Sorts the hits. The sort is stable, so ties keep their traversal order.
    pub fn new(mut hits: Vec<Intersection>) -> Intersections {
        hits.sort_by_key(|i| OrderedFloat(i.t));
        Intersections(hits)
    }

    /// The visible intersection: the one with the smallest non-negative `t`.
    pub fn hit(&self) -> Option<&Intersection> {
        self.0.iter().find(|i| i.t >= 0.0)
    }
}

impl Deref for Intersections {
    type Target = [Intersection];

    fn deref(&self) -> &[Intersection] {
        &self.0
    }
}

impl IntoIterator for Intersections {
    type Item = Intersection;
    type IntoIter = std::vec::IntoIter<Intersection>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Shading state derived from a single hit.
#[derive(Clone, Debug)]
pub struct Computations {
    pub t: FloatType,
    pub shape: ShapeIdx,
    pub point: WorldPoint,
    pub eyev: WorldVector,
    pub normalv: WorldVector,
    /// The ray started inside the shape; `normalv` was flipped to face the eye.
    pub inside: bool,
    /// Point lifted above the surface, origin of shadow and reflection rays.
    pub over_point: WorldPoint,
    /// Point pushed below the surface, origin of refraction rays.
    pub under_point: WorldPoint,
    pub reflectv: WorldVector,
    /// Refractive index of the medium being exited.
    pub n1: FloatType,
    /// Refractive index of the medium being entered.
    pub n2: FloatType,
}

impl Computations {
    /// Prepares shading state for `hit`, which must be one of `xs`.
    ///
    /// `xs` is the full sorted intersection list of `ray`, including negative `t`;
    /// it is replayed to find which refractive media the ray is in at the hit.
    pub fn prepare(hit: &Intersection, ray: &Ray, xs: &Intersections, world: &World) -> Computations {
        let shapes = world.shapes();
        let point = ray.position(hit.t);
        let eyev = -ray.direction;
        let mut normalv = shapes.normal_at(hit.shape, &point);

        let inside = normalv.dot(&eyev) < 0.0;
        if inside {
            normalv = -normalv;
        }

        let (n1, n2) = refractive_indices(hit, xs, world);

        Computations {
            t: hit.t,
            shape: hit.shape,
            point,
            eyev,
            normalv,
            inside,
            over_point: point + normalv * EPSILON,
            under_point: point - normalv * EPSILON,
            reflectv: reflect(&ray.direction, &normalv),
            n1,
            n2,
        }
    }

    /// Schlick approximation of the Fresnel reflectance.
    pub fn schlick(&self) -> FloatType {
        let mut cos = self.eyev.dot(&self.normalv);

        if self.n1 > self.n2 {
            let n = self.n1 / self.n2;
            let sin2_t = n * n * (1.0 - cos * cos);
            if sin2_t > 1.0 {
                return 1.0;
            }
            cos = (1.0 - sin2_t).sqrt();
        }

        let r0 = ((self.n1 - self.n2) / (self.n1 + self.n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cos).powi(5)
    }
}

/// Replays the intersections up to `hit`, tracking the shapes the ray is currently inside.
fn refractive_indices(hit: &Intersection, xs: &Intersections, world: &World) -> (FloatType, FloatType) {
    let index_of = |containers: &[ShapeIdx]| {
        containers
            .last()
            .map_or(1.0, |&shape| world.material_of(shape).refractive_index)
    };

    let mut containers: Vec<ShapeIdx> = Vec::new();
    let mut n1 = 1.0;

    for i in xs.iter() {
        if i == hit {
            n1 = index_of(&containers);
        }

        match containers.iter().position(|&s| s == i.shape) {
            Some(pos) => {
                containers.remove(pos);
            }
            None => containers.push(i.shape),
        }

        if i == hit {
            return (n1, index_of(&containers));
        }
    }

    (n1, index_of(&containers))
}
