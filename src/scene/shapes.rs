use index_vec::IndexVec;
use log::debug;

use crate::geometry::{AABB, Ray, RayIntersectionExt as _, Transform, WorldPoint, WorldVector};
use crate::scene::{
    MaterialIdx, SceneError,
    intersection::{Intersection, Intersections},
    primitives::{Cone, Cube, Cylinder, LocalHits, Object, Plane, Sphere},
};

index_vec::define_index_type! {
    pub struct ShapeIdx = u32;
}

/// Closed set of renderable primitives.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Plane(Plane),
    Cube(Cube),
    Cylinder(Cylinder),
    Cone(Cone),
}

impl Object for Primitive {
    fn local_intersect(&self, ray: &Ray) -> LocalHits {
        match self {
            Primitive::Sphere(s) => s.local_intersect(ray),
            Primitive::Plane(p) => p.local_intersect(ray),
            Primitive::Cube(c) => c.local_intersect(ray),
            Primitive::Cylinder(c) => c.local_intersect(ray),
            Primitive::Cone(c) => c.local_intersect(ray),
        }
    }

    fn local_normal_at(&self, point: &WorldPoint) -> WorldVector {
        match self {
            Primitive::Sphere(s) => s.local_normal_at(point),
            Primitive::Plane(p) => p.local_normal_at(point),
            Primitive::Cube(c) => c.local_normal_at(point),
            Primitive::Cylinder(c) => c.local_normal_at(point),
            Primitive::Cone(c) => c.local_normal_at(point),
        }
    }

    fn bounds(&self) -> AABB {
        match self {
            Primitive::Sphere(s) => s.bounds(),
            Primitive::Plane(p) => p.bounds(),
            Primitive::Cube(c) => c.bounds(),
            Primitive::Cylinder(c) => c.bounds(),
            Primitive::Cone(c) => c.bounds(),
        }
    }
}

macro_rules! impl_from_primitive {
    ($($variant:ident),*) => {
        $(
            impl From<$variant> for Primitive {
                fn from(value: $variant) -> Self {
                    Primitive::$variant(value)
                }
            }
        )*
    };
}

impl_from_primitive!(Sphere, Plane, Cube, Cylinder, Cone);

#[derive(Clone, Debug, PartialEq)]
pub enum ShapeKind {
    Primitive(Primitive),
    /// Composite without own geometry.
    /// Children are only ever attached through `Shapes::add_child`.
    Group { children: Vec<ShapeIdx> },
}

#[derive(Clone, Debug)]
pub struct Shape {
    kind: ShapeKind,
    transform: Transform,
    material: Option<MaterialIdx>,
    parent: Option<ShapeIdx>,

    /// Object space bounds, kept current by every mutating operation of `Shapes`.
    bounds: AABB,
}

impl Shape {
    pub fn kind(&self) -> &ShapeKind {
        &self.kind
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Material assigned directly to this shape, without inheritance.
    pub fn own_material(&self) -> Option<MaterialIdx> {
        self.material
    }

    pub fn parent(&self) -> Option<ShapeIdx> {
        self.parent
    }

    /// Object space bounds.
    pub fn bounds(&self) -> &AABB {
        &self.bounds
    }

    /// Bounds in the coordinate frame of the parent (or world, for root shapes).
    pub fn parent_space_bounds(&self) -> AABB {
        self.bounds.transform(self.transform.matrix())
    }

    pub fn children(&self) -> &[ShapeIdx] {
        match &self.kind {
            ShapeKind::Group { children } => children,
            ShapeKind::Primitive(_) => &[],
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self.kind, ShapeKind::Group { .. })
    }
}

/// Arena owning every shape of a scene.
///
/// Parent links and group children are indices into the arena, so the shape graph
/// never forms ownership cycles.
#[derive(Clone, Debug, Default)]
pub struct Shapes {
    shapes: IndexVec<ShapeIdx, Shape>,
}

impl Shapes {
    pub fn new() -> Shapes {
        Shapes::default()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn get(&self, idx: ShapeIdx) -> Result<&Shape, SceneError> {
        self.shapes.get(idx).ok_or(SceneError::UnknownShape(idx))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShapeIdx, &Shape)> {
        self.shapes.iter_enumerated()
    }

    /// Adds a new unattached primitive.
    pub fn add(&mut self, primitive: impl Into<Primitive>, transform: Transform) -> ShapeIdx {
        let primitive = primitive.into();
        self.shapes.push(Shape {
            bounds: primitive.bounds(),
            kind: ShapeKind::Primitive(primitive),
            transform,
            material: None,
            parent: None,
        })
    }

    /// Adds a new unattached group with no children.
    pub fn add_group(&mut self, transform: Transform) -> ShapeIdx {
        self.shapes.push(Shape {
            kind: ShapeKind::Group {
                children: Vec::new(),
            },
            transform,
            material: None,
            parent: None,
            bounds: AABB::empty(),
        })
    }

    /// Attaches `child` to `group` and refreshes the bounds of `group` and all its ancestors.
    pub fn add_child(&mut self, group: ShapeIdx, child: ShapeIdx) -> Result<(), SceneError> {
        self.get(group)?;
        if group == child || self.ancestors(group).any(|a| a == child) {
            return Err(SceneError::CycleDetected { group, child });
        }
        if let Some(parent) = self.get(child)?.parent {
            return Err(SceneError::AlreadyAttached { child, parent });
        }

        match &mut self.shapes[group].kind {
            ShapeKind::Group { children } => children.push(child),
            ShapeKind::Primitive(_) => return Err(SceneError::NotAGroup(group)),
        }
        self.shapes[child].parent = Some(group);
        self.refresh_bounds(group);

        Ok(())
    }

    /// Replaces the transform of a shape and refreshes the bounds of its ancestors.
    pub fn set_transform(&mut self, idx: ShapeIdx, transform: Transform) -> Result<(), SceneError> {
        self.get(idx)?;
        self.shapes[idx].transform = transform;
        if let Some(parent) = self.shapes[idx].parent {
            self.refresh_bounds(parent);
        }
        Ok(())
    }

    pub fn set_material(
        &mut self,
        idx: ShapeIdx,
        material: Option<MaterialIdx>,
    ) -> Result<(), SceneError> {
        self.get(idx)?;
        self.shapes[idx].material = material;
        Ok(())
    }

    /// Material of the shape, inherited from the nearest ancestor that has one.
    pub fn material(&self, idx: ShapeIdx) -> Option<MaterialIdx> {
        std::iter::once(idx)
            .chain(self.ancestors(idx))
            .find_map(|i| self.shapes[i].material)
    }

    /// Iterates the parent chain of a shape, nearest first.
    pub fn ancestors(&self, idx: ShapeIdx) -> impl Iterator<Item = ShapeIdx> {
        std::iter::successors(self.shapes[idx].parent, |&i| self.shapes[i].parent)
    }

    /// Iterates the shape and all of its descendants, depth first.
    pub fn subtree(&self, root: ShapeIdx) -> impl Iterator<Item = ShapeIdx> {
        let mut stack = vec![root];
        std::iter::from_fn(move || {
            let idx = stack.pop()?;
            stack.extend(self.shapes[idx].children().iter().rev());
            Some(idx)
        })
    }

    /// Recomputes object space bounds of `idx` and every ancestor.
    fn refresh_bounds(&mut self, idx: ShapeIdx) {
        let mut current = Some(idx);
        while let Some(idx) = current {
            let bounds = match &self.shapes[idx].kind {
                ShapeKind::Primitive(p) => p.bounds(),
                ShapeKind::Group { children } => children.iter().fold(AABB::empty(), |acc, &c| {
                    acc.union(&self.shapes[c].parent_space_bounds())
                }),
            };
            debug!("Refreshed bounds of shape {idx:?}: {bounds:?}");
            self.shapes[idx].bounds = bounds;
            current = self.shapes[idx].parent;
        }
    }

    /// Intersects a world space ray with the shape and all its descendants.
    pub fn intersect(&self, idx: ShapeIdx, ray: &Ray) -> Intersections {
        self.intersect_counted(idx, ray).0
    }

    /// Same as `intersect`, but also returns how many shapes were visited.
    pub fn intersect_counted(&self, idx: ShapeIdx, ray: &Ray) -> (Intersections, usize) {
        let mut hits = Vec::new();
        let visited = self.intersect_into(idx, ray, &mut hits);
        (Intersections::new(hits), visited)
    }

    /// Appends unsorted hits of the shape subtree to `hits`.
    /// `ray` is given in the parent frame of `idx`. Returns the number of shapes visited.
    pub fn intersect_into(&self, idx: ShapeIdx, ray: &Ray, hits: &mut Vec<Intersection>) -> usize {
        let shape = &self.shapes[idx];
        let local_ray = ray.transform(shape.transform.inverse());

        match &shape.kind {
            ShapeKind::Primitive(primitive) => {
                hits.extend(
                    primitive
                        .local_intersect(&local_ray)
                        .into_iter()
                        .map(|t| Intersection::new(t, idx)),
                );
                1
            }
            ShapeKind::Group { children } => {
                if shape.bounds.intersect(&local_ray).is_none() {
                    return 1;
                }
                1 + children
                    .iter()
                    .map(|&child| self.intersect_into(child, &local_ray, hits))
                    .sum::<usize>()
            }
        }
    }

    /// Converts a world space point to the object space of `idx`, through every ancestor.
    pub fn world_to_object(&self, idx: ShapeIdx, point: &WorldPoint) -> WorldPoint {
        let point = match self.shapes[idx].parent {
            Some(parent) => self.world_to_object(parent, point),
            None => *point,
        };
        self.shapes[idx].transform.inverse().transform_point(&point)
    }

    /// Converts an object space normal of `idx` to a normalized world space normal.
    pub fn normal_to_world(&self, idx: ShapeIdx, normal: &WorldVector) -> WorldVector {
        let normal = (self.shapes[idx].transform.normal_matrix() * normal).normalize();
        match self.shapes[idx].parent {
            Some(parent) => self.normal_to_world(parent, &normal),
            None => normal,
        }
    }

    /// Surface normal of a primitive at a world space point.
    ///
    /// # Panics
    /// Groups have no surface; calling this on a group is a bug. Intersections never
    /// reference groups.
    pub fn normal_at(&self, idx: ShapeIdx, world_point: &WorldPoint) -> WorldVector {
        let ShapeKind::Primitive(primitive) = &self.shapes[idx].kind else {
            panic!("Shape {idx:?} is a group and has no surface normal");
        };
        let local_point = self.world_to_object(idx, world_point);
        let local_normal = primitive.local_normal_at(&local_point);
        self.normal_to_world(idx, &local_normal)
    }

    /// Number of groups above the shape.
    pub fn depth(&self, idx: ShapeIdx) -> usize {
        self.ancestors(idx).count()
    }
}

impl std::ops::Index<ShapeIdx> for Shapes {
    type Output = Shape;

    fn index(&self, idx: ShapeIdx) -> &Shape {
        &self.shapes[idx]
    }
}
