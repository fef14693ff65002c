//! Sparse spatial trees refined and queried by casting rays.
//!
//! The crate has three layers:
//!
//! - Geometry: [`Ray`], axis-aligned boxes ([`Aabb`]) with octant
//!   subdivision, and the slab ray/box test in [`intersection`].
//! - [`tree`]: a generic sparse `N`-ary tree whose traversals are steered
//!   entirely by caller strategies.
//! - [`Tracer`]: builds, burns and casts rays through an [`Octree`].
//!
//! All geometry is generic over the scalar type (`f32` or `f64`) and
//! compares floats with the epsilon-tolerant predicates in [`scalar`].

mod aabb;
mod error;
pub mod intersection;
mod ray;
pub mod scalar;
mod tracer;
pub mod tree;

pub use aabb::{Aabb, Axis};
pub use error::ShapeError;
pub use intersection::{ray_shape_distance, ray_shape_intersection, Hit};
pub use ray::{points_equal, vectors_equal, Ray};
pub use tracer::{build_tree, burn_tree, cast_tree, CastHit, Refinement, Tracer};
pub use tree::{Node, Octree, Tree};
