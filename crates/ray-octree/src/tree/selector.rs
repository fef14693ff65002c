//! Shape-aware strategies for tree operations.
//!
//! Where node visitors see an opaque context, tree strategies see the shape
//! of the node being visited together with the caller's arguments. The
//! splitter tells the tree how a parent shape divides among its children.

use nalgebra::RealField;

use super::{ChildIndices, Node};
use crate::Aabb;

/// Chooses children by looking at a node's shape.
///
/// Used by [`Tree::insert_nodes`](super::Tree::insert_nodes) to name the
/// children to create and by [`Tree::remove_nodes`](super::Tree::remove_nodes)
/// to name the children to destroy.
pub trait ShapeSelector<S, A: ?Sized> {
    /// Returns the child indices selected for the node occupying `shape`.
    fn select(&mut self, shape: &S, args: &A) -> ChildIndices;
}

/// Inspects or updates a node's payload knowing its shape.
///
/// Used by [`Tree::process_nodes`](super::Tree::process_nodes).
pub trait PayloadSelector<P, S, A: ?Sized> {
    /// Processes the payload of the node occupying `shape` and returns the
    /// children to descend into.
    fn select(&mut self, payload: &mut P, shape: &S, args: &A) -> ChildIndices;
}

/// Inspects whole nodes read-only knowing their shape.
///
/// Used by [`Tree::walk_nodes`](super::Tree::walk_nodes). Unlike
/// [`PayloadSelector`] it sees the child slots, so it can tell leaves apart.
pub trait NodeSelector<P, S, const N: usize, A: ?Sized> {
    /// Inspects the node occupying `shape` and returns the children to enter.
    fn select(&mut self, node: &Node<P, N>, shape: &S, args: &A) -> ChildIndices;
}

/// Computes the shape of a child from the shape of its parent.
pub trait ShapeSplitter<S> {
    /// Returns the shape of the child at `index` inside `parent`.
    fn child_shape(&self, index: usize, parent: &S) -> S;
}

impl<S, A: ?Sized, F> ShapeSelector<S, A> for F
where
    F: FnMut(&S, &A) -> ChildIndices,
{
    fn select(&mut self, shape: &S, args: &A) -> ChildIndices {
        self(shape, args)
    }
}

impl<P, S, A: ?Sized, F> PayloadSelector<P, S, A> for F
where
    F: FnMut(&mut P, &S, &A) -> ChildIndices,
{
    fn select(&mut self, payload: &mut P, shape: &S, args: &A) -> ChildIndices {
        self(payload, shape, args)
    }
}

impl<P, S, A: ?Sized, F, const N: usize> NodeSelector<P, S, N, A> for F
where
    F: FnMut(&Node<P, N>, &S, &A) -> ChildIndices,
{
    fn select(&mut self, node: &Node<P, N>, shape: &S, args: &A) -> ChildIndices {
        self(node, shape, args)
    }
}

impl<S, F> ShapeSplitter<S> for F
where
    F: Fn(usize, &S) -> S,
{
    fn child_shape(&self, index: usize, parent: &S) -> S {
        self(index, parent)
    }
}

/// Splits an axis-aligned box into its eight octants.
#[derive(Debug, Clone, Copy, Default)]
pub struct Octants;

impl<T: RealField + Copy> ShapeSplitter<Aabb<T>> for Octants {
    fn child_shape(&self, index: usize, parent: &Aabb<T>) -> Aabb<T> {
        parent.octant(index)
    }
}

/// Selects every child of every node.
///
/// As an insert selector it grows a full tree, so pair it with a splitter or
/// arguments that stop the recursion.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllChildren<const N: usize>;

impl<S, A: ?Sized, const N: usize> ShapeSelector<S, A> for AllChildren<N> {
    fn select(&mut self, _shape: &S, _args: &A) -> ChildIndices {
        (0..N).collect()
    }
}

impl<P, S, A: ?Sized, const N: usize> PayloadSelector<P, S, A> for AllChildren<N> {
    fn select(&mut self, _payload: &mut P, _shape: &S, _args: &A) -> ChildIndices {
        (0..N).collect()
    }
}

/// Records the shape and payload of every visited node, descending everywhere.
#[derive(Debug)]
pub struct ShapeCollector<S, P, const N: usize> {
    collected: Vec<(S, P)>,
}

impl<S, P, const N: usize> Default for ShapeCollector<S, P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, P, const N: usize> ShapeCollector<S, P, N> {
    /// Creates a new empty collector.
    pub fn new() -> Self {
        Self {
            collected: Vec::new(),
        }
    }

    /// Returns the collected `(shape, payload)` pairs in visiting order.
    pub fn into_nodes(self) -> Vec<(S, P)> {
        self.collected
    }

    /// Returns a reference to the collected pairs.
    pub fn nodes(&self) -> &[(S, P)] {
        &self.collected
    }
}

impl<S: Clone, P: Clone, A: ?Sized, const N: usize> PayloadSelector<P, S, A>
    for ShapeCollector<S, P, N>
{
    fn select(&mut self, payload: &mut P, shape: &S, _args: &A) -> ChildIndices {
        self.collected.push((shape.clone(), payload.clone()));
        (0..N).collect()
    }
}
