//! Shape-aware tree container.

use tracing::{debug, trace};

use super::node::{Children, Node};
use super::selector::{NodeSelector, PayloadSelector, ShapeSelector, ShapeSplitter};
use super::visitor::{ChildrenVisitor, Interpolate, NodeVisitor, PayloadVisitor};
use super::ChildIndices;
use crate::Aabb;

/// Traversal context threaded through tree operations.
///
/// Carries the shape of the node being visited and the caller's arguments.
/// Arguments are shared by every node; the shape is recomputed per child.
#[derive(Debug)]
pub struct ShapeContext<'a, S, A: ?Sized> {
    /// Shape occupied by the node being visited.
    pub shape: S,
    /// Caller arguments, forwarded unchanged.
    pub args: &'a A,
}

/// A sparse `N`-ary tree whose root occupies a shape.
///
/// The tree stores only payloads. Shapes are never stored: the shape of any
/// node is derived on the way down from the root shape by the
/// [`ShapeSplitter`] passed to each operation, so the same tree can be read
/// with different subdivision rules.
///
/// All operations are depth-first, parent before children, and descend only
/// into children that exist once the current node has been visited.
#[derive(Debug, Clone)]
pub struct Tree<P, S, const N: usize> {
    root: Node<P, N>,
    shape: S,
}

/// An octree over axis-aligned boxes.
pub type Octree<P, T> = Tree<P, Aabb<T>, 8>;

impl<P: Default, S, const N: usize> Tree<P, S, N> {
    /// Creates a tree holding a single default root node occupying `shape`.
    pub fn new(shape: S) -> Self {
        Self {
            root: Node::default(),
            shape,
        }
    }
}

impl<P, S, const N: usize> Tree<P, S, N> {
    /// Creates a tree from an existing root node.
    pub fn with_root(root: Node<P, N>, shape: S) -> Self {
        Self { root, shape }
    }

    /// Returns the root node.
    #[inline]
    pub fn root(&self) -> &Node<P, N> {
        &self.root
    }

    /// Returns a mutable reference to the root node.
    #[inline]
    pub fn root_mut(&mut self) -> &mut Node<P, N> {
        &mut self.root
    }

    /// Returns the shape occupied by the root.
    #[inline]
    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// Returns the total number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Returns the maximum depth of the tree (1 for a lone root).
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Removes every node below the root, keeping the root payload.
    pub fn clear(&mut self) {
        for index in 0..N {
            self.root.set_child(index, None);
        }
    }

    /// Returns every child index of a node, in order.
    pub fn child_indices() -> [usize; N] {
        std::array::from_fn(|index| index)
    }

    /// Creates children wherever `selector` asks for them.
    ///
    /// At each visited node the selector names the children it wants; empty
    /// slots among them receive a default node, existing children are kept
    /// as they are, and every named child is then visited in turn. Indices
    /// outside `0..N` are ignored.
    ///
    /// The selector must eventually return no indices (for example once a
    /// shape is small enough), otherwise insertion never terminates.
    ///
    /// Returns the number of nodes created.
    pub fn insert_nodes<F, G, A>(&mut self, selector: &mut F, splitter: &G, args: &A) -> usize
    where
        P: Default,
        S: Clone,
        F: ShapeSelector<S, A>,
        G: ShapeSplitter<S>,
        A: ?Sized,
    {
        let context = ShapeContext {
            shape: self.shape.clone(),
            args,
        };
        let mut inserter = Inserter { selector, created: 0 };
        self.root
            .process_children(&mut inserter, &ShapeInterpolator { splitter }, &context);
        debug!(created = inserter.created, "inserted nodes");
        inserter.created
    }

    /// Destroys the children `selector` names, together with their subtrees.
    ///
    /// Traversal continues into the children that were not named. Naming an
    /// empty slot is a no-op.
    ///
    /// Returns the number of nodes destroyed, descendants included.
    pub fn remove_nodes<F, G, A>(&mut self, selector: &mut F, splitter: &G, args: &A) -> usize
    where
        S: Clone,
        F: ShapeSelector<S, A>,
        G: ShapeSplitter<S>,
        A: ?Sized,
    {
        let context = ShapeContext {
            shape: self.shape.clone(),
            args,
        };
        let mut remover = Remover { selector, removed: 0 };
        self.root
            .process_children(&mut remover, &ShapeInterpolator { splitter }, &context);
        debug!(removed = remover.removed, "removed nodes");
        remover.removed
    }

    /// Visits payloads with their shapes, descending where `selector` says.
    ///
    /// The tree structure is left untouched; only payloads may change.
    pub fn process_nodes<F, G, A>(&mut self, selector: &mut F, splitter: &G, args: &A)
    where
        S: Clone,
        F: PayloadSelector<P, S, A>,
        G: ShapeSplitter<S>,
        A: ?Sized,
    {
        let context = ShapeContext {
            shape: self.shape.clone(),
            args,
        };
        self.root.process_payload(
            &mut Processor { selector },
            &ShapeInterpolator { splitter },
            &context,
        );
    }

    /// Visits whole nodes with their shapes without modifying anything.
    ///
    /// The selector sees each node's child slots as well as its payload, and
    /// descends where it says, as in [`process_nodes`](Self::process_nodes).
    pub fn walk_nodes<F, G, A>(&self, selector: &mut F, splitter: &G, args: &A)
    where
        S: Clone,
        F: NodeSelector<P, S, N, A>,
        G: ShapeSplitter<S>,
        A: ?Sized,
    {
        let context = ShapeContext {
            shape: self.shape.clone(),
            args,
        };
        self.root
            .walk(&mut Walker { selector }, &ShapeInterpolator { splitter }, &context);
    }
}

/// Derives child contexts by splitting the parent shape.
struct ShapeInterpolator<'g, G> {
    splitter: &'g G,
}

impl<'a, S, A, G> Interpolate<ShapeContext<'a, S, A>> for ShapeInterpolator<'_, G>
where
    A: ?Sized,
    G: ShapeSplitter<S>,
{
    fn interpolate(&self, index: usize, context: &ShapeContext<'a, S, A>) -> ShapeContext<'a, S, A> {
        ShapeContext {
            shape: self.splitter.child_shape(index, &context.shape),
            args: context.args,
        }
    }
}

struct Inserter<'f, F> {
    selector: &'f mut F,
    created: usize,
}

impl<'a, P, S, A, F, const N: usize> ChildrenVisitor<P, ShapeContext<'a, S, A>, N>
    for Inserter<'_, F>
where
    P: Default,
    A: ?Sized,
    F: ShapeSelector<S, A>,
{
    fn visit(&mut self, children: &mut Children<P, N>, context: &ShapeContext<'a, S, A>) -> ChildIndices {
        let targets = self.selector.select(&context.shape, context.args);
        for &index in &targets {
            if let Some(slot) = children.get_mut(index).filter(|slot| slot.is_none()) {
                trace!(index, "creating child");
                *slot = Some(Box::default());
                self.created += 1;
            }
        }
        targets
    }
}

struct Remover<'f, F> {
    selector: &'f mut F,
    removed: usize,
}

impl<'a, P, S, A, F, const N: usize> ChildrenVisitor<P, ShapeContext<'a, S, A>, N>
    for Remover<'_, F>
where
    A: ?Sized,
    F: ShapeSelector<S, A>,
{
    fn visit(&mut self, children: &mut Children<P, N>, context: &ShapeContext<'a, S, A>) -> ChildIndices {
        let targets = self.selector.select(&context.shape, context.args);
        for &index in &targets {
            if let Some(child) = children.get_mut(index).and_then(Option::take) {
                trace!(index, "removed child");
                self.removed += child.node_count();
            }
        }
        (0..N).filter(|index| !targets.contains(index)).collect()
    }
}

struct Processor<'f, F> {
    selector: &'f mut F,
}

impl<'a, P, S, A, F> PayloadVisitor<P, ShapeContext<'a, S, A>> for Processor<'_, F>
where
    A: ?Sized,
    F: PayloadSelector<P, S, A>,
{
    fn visit(&mut self, payload: &mut P, context: &ShapeContext<'a, S, A>) -> ChildIndices {
        self.selector.select(payload, &context.shape, context.args)
    }
}

struct Walker<'f, F> {
    selector: &'f mut F,
}

impl<'a, P, S, A, F, const N: usize> NodeVisitor<P, ShapeContext<'a, S, A>, N> for Walker<'_, F>
where
    A: ?Sized,
    F: NodeSelector<P, S, N, A>,
{
    fn visit(&mut self, node: &Node<P, N>, context: &ShapeContext<'a, S, A>) -> ChildIndices {
        self.selector.select(node, &context.shape, context.args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Octants, ShapeCollector};
    use nalgebra::Point3;
    use smallvec::smallvec;

    /// Shape that is just the depth of the node.
    fn deeper(_index: usize, depth: &usize) -> usize {
        depth + 1
    }

    /// Selects `indices` at every node shallower than `max_depth`.
    fn up_to(indices: ChildIndices) -> impl FnMut(&usize, &usize) -> ChildIndices {
        move |depth: &usize, max_depth: &usize| {
            if depth < max_depth { indices.clone() } else { ChildIndices::new() }
        }
    }

    #[test]
    fn new_tree_is_lone_root() {
        let tree: Tree<u8, usize, 4> = Tree::new(0);

        assert!(tree.root().is_leaf());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.depth(), 1);
        assert_eq!(*tree.shape(), 0);
        assert_eq!(Tree::<u8, usize, 4>::child_indices(), [0, 1, 2, 3]);
    }

    #[test]
    fn insert_respects_arguments() {
        let mut tree: Tree<u8, usize, 4> = Tree::new(0);
        let created = tree.insert_nodes(&mut up_to(smallvec![0, 2]), &deeper, &2);

        assert_eq!(created, 6);
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.node_count(), 1 + 2 + 4);
        assert_eq!(tree.root().occupancy(), [true, false, true, false]);
    }

    #[test]
    fn insert_then_remove_restores_root() {
        let mut tree: Tree<u8, usize, 4> = Tree::new(0);
        let created = tree.insert_nodes(&mut up_to(smallvec![0, 2]), &deeper, &3);
        let removed = tree.remove_nodes(&mut up_to(smallvec![0, 2]), &deeper, &3);

        assert_eq!(created, 2 + 4 + 8);
        assert_eq!(removed, created);
        assert_eq!(tree.root().occupancy(), [false; 4]);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn insert_keeps_existing_children() {
        let mut root: Node<u8, 4> = Node::new(0);
        root.set_child(1, Some(Node::new(7)));
        let mut tree = Tree::with_root(root, 0_usize);

        let created = tree.insert_nodes(&mut up_to(smallvec![1, 3, 9]), &deeper, &1);

        assert_eq!(created, 1);
        assert_eq!(tree.root().child(1).map(|n| *n.payload()), Some(7));
        assert_eq!(tree.root().child(3).map(|n| *n.payload()), Some(0));
        assert_eq!(tree.root().occupancy(), [false, true, false, true]);
    }

    #[test]
    fn remove_descends_into_complement() {
        let mut tree: Tree<u8, usize, 2> = Tree::new(0);
        tree.insert_nodes(&mut up_to(smallvec![0, 1]), &deeper, &2);
        assert_eq!(tree.node_count(), 7);

        // Drop child 0 of the root and child 0 of every surviving node below it.
        let removed = tree.remove_nodes(
            &mut |_: &usize, _: &()| -> ChildIndices { smallvec![0] },
            &deeper,
            &(),
        );

        assert_eq!(tree.root().occupancy(), [false, true]);
        let right = tree.root().child(1).map(Node::occupancy);
        assert_eq!(right, Some([false, true]));
        assert_eq!(tree.node_count(), 3);
        assert_eq!(removed, 4);
    }

    #[test]
    fn removing_empty_slot_is_noop() {
        let mut tree: Tree<u8, usize, 4> = Tree::new(0);
        tree.insert_nodes(&mut up_to(smallvec![2]), &deeper, &1);

        let removed = tree.remove_nodes(&mut up_to(smallvec![0, 1]), &deeper, &1);

        assert_eq!(removed, 0);
        assert_eq!(tree.root().occupancy(), [false, false, true, false]);
    }

    #[test]
    fn process_sees_split_shapes() {
        let cube = Aabb::new(Point3::new(0.0_f32, 0.0, 0.0), Point3::new(2.0, 2.0, 2.0));
        let mut tree: Octree<u8, f32> = Tree::new(cube);

        // The root diagonal is about 3.46 and the octant diagonal about 1.73.
        tree.insert_nodes(
            &mut |shape: &Aabb<f32>, limit: &f32| -> ChildIndices {
                if shape.diagonal() > *limit { (0..8).collect() } else { ChildIndices::new() }
            },
            &Octants,
            &2.0,
        );
        assert_eq!(tree.node_count(), 9);

        let mut collector = ShapeCollector::<Aabb<f32>, u8, 8>::new();
        tree.process_nodes(&mut collector, &Octants, &());
        let nodes = collector.into_nodes();

        assert_eq!(nodes.len(), 9);
        assert_eq!(nodes[0].0, cube);
        for (index, octant) in cube.octants().iter().enumerate() {
            assert_eq!(nodes[index + 1].0, *octant);
        }
    }

    #[test]
    fn process_updates_payloads() {
        let mut tree: Tree<usize, usize, 2> = Tree::new(0);
        tree.insert_nodes(&mut up_to(smallvec![0, 1]), &deeper, &2);

        tree.process_nodes(
            &mut |payload: &mut usize, depth: &usize, _: &()| -> ChildIndices {
                *payload = *depth;
                smallvec![1]
            },
            &deeper,
            &(),
        );

        assert_eq!(*tree.root().payload(), 0);
        assert_eq!(tree.root().child(0).map(|n| *n.payload()), Some(0));
        assert_eq!(tree.root().child(1).map(|n| *n.payload()), Some(1));
        assert_eq!(
            tree.root().child(1).and_then(|n| n.child(1)).map(|n| *n.payload()),
            Some(2)
        );
    }

    #[test]
    fn walk_sees_shapes_and_leaves() {
        let mut tree: Tree<u8, usize, 2> = Tree::new(0);
        tree.insert_nodes(&mut up_to(smallvec![0, 1]), &deeper, &2);
        tree.remove_nodes(
            &mut |depth: &usize, _: &()| -> ChildIndices {
                if *depth == 0 { smallvec![1] } else { ChildIndices::new() }
            },
            &deeper,
            &(),
        );

        let mut leaves = Vec::new();
        tree.walk_nodes(
            &mut |node: &Node<u8, 2>, depth: &usize, _: &()| -> ChildIndices {
                if node.is_leaf() {
                    leaves.push(*depth);
                }
                smallvec![0, 1]
            },
            &deeper,
            &(),
        );

        assert_eq!(leaves, vec![2, 2]);
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn clear_keeps_root_payload() {
        let mut tree: Tree<u8, usize, 2> = Tree::new(0);
        *tree.root_mut().payload_mut() = 5;
        tree.insert_nodes(&mut up_to(smallvec![0, 1]), &deeper, &3);

        tree.clear();

        assert_eq!(tree.node_count(), 1);
        assert_eq!(*tree.root().payload(), 5);
    }
}
