//! Building, burning and querying octrees with rays.
//!
//! A [`Tracer`] refines an [`Octree`] along a ray until boxes are no larger
//! than its power budget, burns such refinements away again, and casts rays
//! against the refined tree to find the nearest resolved box they strike.
//!
//! # Example
//!
//! ```
//! use nalgebra::{Point3, Vector3};
//! use ray_octree::{Aabb, Octree, Ray, Tracer};
//!
//! let cube = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(8.0, 8.0, 8.0));
//! let mut tree: Octree<(), f32> = Octree::new(cube);
//! let ray = Ray::new(Point3::new(-1.0, 1.0, 3.0), Vector3::new(1.0, 0.0, 0.0));
//!
//! let tracer = Tracer::new(1.0);
//! tracer.build(&mut tree, &ray);
//! let hit = tracer.cast(&tree, &ray).unwrap();
//!
//! assert!(hit.shape.diagonal() <= 1.0);
//! assert!((hit.distance - 1.0).abs() < 1e-6);
//! ```

use nalgebra::RealField;
use smallvec::smallvec;
use tracing::{debug, warn};

use crate::intersection::ray_shape_intersection;
use crate::scalar::{is_equal, is_less, is_positive};
use crate::tree::{ChildIndices, Node, NodeSelector, Octants, Octree, ShapeSelector};
use crate::{Aabb, Ray};

/// Which children a build or burn selects at a box the ray strikes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refinement {
    /// Only the octant containing the entry point, giving one chain of
    /// boxes per ray.
    #[default]
    EntryOctant,
    /// All eight octants. Children the ray misses stop the recursion on
    /// the next level.
    AllOctants,
}

/// The box a cast ray resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct CastHit<T: RealField + Copy, P> {
    /// Distance to the entry point, in units of the ray direction.
    pub distance: T,
    /// The ray mirrored off the struck face.
    pub reflect: Ray<T>,
    /// Payload of the struck node.
    pub payload: P,
    /// Box of the struck node.
    pub shape: Aabb<T>,
}

/// Ray-driven construction and queries on octrees.
///
/// `power` is the resolution budget: boxes are subdivided while their
/// diagonal is larger than it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tracer<T> {
    power: T,
    refinement: Refinement,
}

impl<T: RealField + Copy> Tracer<T> {
    /// Creates a tracer with the given power and entry-octant refinement.
    ///
    /// A power that is not positive never stops refinement, so [`build`]
    /// refuses it. Burning and casting still work with such a tracer.
    ///
    /// [`build`]: Self::build
    pub fn new(power: T) -> Self {
        Self {
            power,
            refinement: Refinement::default(),
        }
    }

    /// Sets the refinement strategy.
    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinement = refinement;
        self
    }

    /// Returns the resolution budget.
    #[inline]
    pub fn power(&self) -> T {
        self.power
    }

    /// Returns the refinement strategy.
    #[inline]
    pub fn refinement(&self) -> Refinement {
        self.refinement
    }

    /// Refines `tree` along `ray`.
    ///
    /// Every box the ray enters at a positive distance whose diagonal exceeds
    /// the power gets children per the refinement strategy. Rays starting
    /// inside the root box leave the tree unchanged.
    #[tracing::instrument(skip_all, name = "tracer::build")]
    pub fn build<P: Default>(&self, tree: &mut Octree<P, T>, ray: &Ray<T>) {
        if !is_positive(self.power) {
            warn!("refusing to build with a non-positive power");
            return;
        }
        tree.insert_nodes(&mut self.refiner(ray), &Octants, &());
    }

    /// Removes from `tree` the children a build along `ray` would select.
    ///
    /// Traversal continues into the siblings that were not removed, so one
    /// burn undoes one build with the same ray.
    #[tracing::instrument(skip_all, name = "tracer::burn")]
    pub fn burn<P>(&self, tree: &mut Octree<P, T>, ray: &Ray<T>) {
        tree.remove_nodes(&mut self.refiner(ray), &Octants, &());
    }

    /// Casts `ray` through `tree` and returns the nearest resolved box it
    /// strikes.
    ///
    /// A box is resolved when it is a leaf or its diagonal is within the
    /// power; the cast does not descend below it. Among struck resolved boxes
    /// the nearest entry wins, and equal distances go to the smaller box,
    /// then to the box visited first. Subdivided boxes above the power are
    /// reported only when the ray strikes no resolved box. Boxes the ray
    /// neither strikes nor starts in are skipped with their subtrees.
    ///
    /// Returns `None` if the ray strikes no box at a positive distance.
    #[tracing::instrument(skip_all, name = "tracer::cast")]
    pub fn cast<P: Clone>(&self, tree: &Octree<P, T>, ray: &Ray<T>) -> Option<CastHit<T, P>> {
        let mut caster = Caster::new(ray, self.power);
        tree.walk_nodes(&mut caster, &Octants, &());

        let visited = caster.visited;
        let hit = caster.finish();
        match &hit {
            Some(hit) => debug!(visited, distance = ?hit.distance, "cast hit"),
            None => debug!(visited, "cast missed"),
        }
        hit
    }

    fn refiner<'r>(&self, ray: &'r Ray<T>) -> Refiner<'r, T> {
        Refiner {
            ray,
            power: self.power,
            refinement: self.refinement,
        }
    }
}

/// Refines `tree` along `ray` down to boxes no larger than `power`.
pub fn build_tree<P: Default, T: RealField + Copy>(tree: &mut Octree<P, T>, ray: &Ray<T>, power: T) {
    Tracer::new(power).build(tree, ray);
}

/// Removes the refinement a [`build_tree`] with the same arguments creates.
pub fn burn_tree<P, T: RealField + Copy>(tree: &mut Octree<P, T>, ray: &Ray<T>, power: T) {
    Tracer::new(power).burn(tree, ray);
}

/// Casts `ray` through `tree`; see [`Tracer::cast`].
pub fn cast_tree<P: Clone, T: RealField + Copy>(
    tree: &Octree<P, T>,
    ray: &Ray<T>,
    power: T,
) -> Option<CastHit<T, P>> {
    Tracer::new(power).cast(tree, ray)
}

/// Selects the children to refine at boxes the ray strikes.
struct Refiner<'r, T: RealField + Copy> {
    ray: &'r Ray<T>,
    power: T,
    refinement: Refinement,
}

impl<T: RealField + Copy> ShapeSelector<Aabb<T>, ()> for Refiner<'_, T> {
    fn select(&mut self, shape: &Aabb<T>, _args: &()) -> ChildIndices {
        if !is_less(self.power, shape.diagonal()) {
            return ChildIndices::new();
        }
        let Some(hit) = ray_shape_intersection(self.ray, shape) else {
            return ChildIndices::new();
        };

        match self.refinement {
            Refinement::EntryOctant => smallvec![shape.octant_of(&hit.point())],
            Refinement::AllOctants => (0..8).collect(),
        }
    }
}

/// Tracks the nearest struck box, keeping resolved boxes apart from the
/// subdivided ones passed on the way down.
struct Caster<'r, T: RealField + Copy, P> {
    ray: &'r Ray<T>,
    power: T,
    resolved: Option<CastHit<T, P>>,
    fallback: Option<CastHit<T, P>>,
    visited: usize,
}

impl<'r, T: RealField + Copy, P> Caster<'r, T, P> {
    fn new(ray: &'r Ray<T>, power: T) -> Self {
        Self {
            ray,
            power,
            resolved: None,
            fallback: None,
            visited: 0,
        }
    }

    fn finish(self) -> Option<CastHit<T, P>> {
        self.resolved.or(self.fallback)
    }
}

/// Whether a hit at `distance` on a box of `diagonal` beats `best`.
fn improves<T: RealField + Copy, P>(best: Option<&CastHit<T, P>>, distance: T, diagonal: T) -> bool {
    let Some(best) = best else {
        return true;
    };
    is_less(distance, best.distance)
        || (is_equal(distance, best.distance) && is_less(diagonal, best.shape.diagonal()))
}

impl<T: RealField + Copy, P: Clone> NodeSelector<P, Aabb<T>, 8, ()> for Caster<'_, T, P> {
    fn select(&mut self, node: &Node<P, 8>, shape: &Aabb<T>, _args: &()) -> ChildIndices {
        let hit = ray_shape_intersection(self.ray, shape);
        if hit.is_none() && !shape.contains(&self.ray.pos()) {
            return ChildIndices::new();
        }
        self.visited += 1;

        let diagonal = shape.diagonal();
        let resolved = node.is_leaf() || !is_less(self.power, diagonal);
        if let Some(hit) = hit {
            let slot = if resolved { &mut self.resolved } else { &mut self.fallback };
            if improves(slot.as_ref(), hit.distance, diagonal) {
                *slot = Some(CastHit {
                    distance: hit.distance,
                    reflect: hit.reflect,
                    payload: node.payload().clone(),
                    shape: *shape,
                });
            }
        }

        if resolved {
            ChildIndices::new()
        } else {
            (0..8).collect()
        }
    }
}
