//! Sparse `N`-ary trees driven by caller-supplied strategies.
//!
//! The module is split in two layers:
//!
//! - [`Node`] is a plain tree of payloads. Its traversals take a visitor that
//!   answers which children to descend into and an [`Interpolate`] strategy
//!   that derives the context of each child from its parent's.
//! - [`Tree`] pairs a root node with the shape it occupies. Its operations
//!   thread a [`ShapeContext`] through the node traversals, computing child
//!   shapes with a [`ShapeSplitter`] as they go.
//!
//! # Example
//!
//! ```
//! use ray_octree::tree::{ChildIndices, Tree};
//! use smallvec::smallvec;
//!
//! // A binary tree whose "shape" is just the depth of the node.
//! let mut tree: Tree<u32, usize, 2> = Tree::new(0);
//! tree.insert_nodes(
//!     &mut |depth: &usize, _: &()| -> ChildIndices {
//!         if *depth < 3 { smallvec![0] } else { ChildIndices::new() }
//!     },
//!     &|_index: usize, depth: &usize| depth + 1,
//!     &(),
//! );
//!
//! assert_eq!(tree.depth(), 4);
//! ```

mod node;
mod selector;
mod spatial;
mod visitor;

use smallvec::SmallVec;

/// Child indices returned by visitors and selectors.
///
/// Inline capacity covers the full fan-out of an octree.
pub type ChildIndices = SmallVec<[usize; 8]>;

pub use node::{Children, Node};
pub use selector::{
    AllChildren, NodeSelector, Octants, PayloadSelector, ShapeCollector, ShapeSelector,
    ShapeSplitter,
};
pub use spatial::{Octree, ShapeContext, Tree};
pub use visitor::{
    ChildrenVisitor, CollectingVisitor, Inherit, Interpolate, NodeVisitor, PayloadVisitor,
};
