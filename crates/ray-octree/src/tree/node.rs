//! Tree node and the generic traversal engine.

use super::visitor::{ChildrenVisitor, Interpolate, NodeVisitor, PayloadVisitor};

/// Fixed-size array of optional, exclusively owned child nodes.
pub type Children<P, const N: usize> = [Option<Box<Node<P, N>>>; N];

/// A node of an `N`-ary tree.
///
/// Each node owns a payload and `N` child slots. A slot is either empty or
/// owns its child outright; there are no parent links and no sharing.
///
/// Nodes have no notion of space. Geometry enters a traversal only through
/// the context the caller threads through it: the node hands its payload (or
/// its child slots) and the current context to a visitor, the visitor
/// answers which children to enter, and an [`Interpolate`] strategy derives
/// the context of each child that is entered.
#[derive(Debug, Clone)]
pub struct Node<P, const N: usize> {
    payload: P,
    children: Children<P, N>,
}

impl<P: Default, const N: usize> Default for Node<P, N> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P, const N: usize> Node<P, N> {
    /// Creates a new node holding `payload` with every child slot empty.
    pub fn new(payload: P) -> Self {
        Self {
            payload,
            children: std::array::from_fn(|_| None),
        }
    }

    /// Creates a new node from a payload and a set of child slots.
    pub fn with_children(payload: P, children: Children<P, N>) -> Self {
        Self { payload, children }
    }

    /// Returns a reference to the payload.
    #[inline]
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Returns a mutable reference to the payload.
    #[inline]
    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Returns the child slots.
    #[inline]
    pub fn children(&self) -> &Children<P, N> {
        &self.children
    }

    /// Returns the child at `index`, if the index is in range and occupied.
    #[inline]
    pub fn child(&self, index: usize) -> Option<&Node<P, N>> {
        self.children.get(index)?.as_deref()
    }

    /// Returns a mutable reference to the child at `index`.
    #[inline]
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Node<P, N>> {
        self.children.get_mut(index)?.as_deref_mut()
    }

    /// Replaces the child at `index`, returning the previous occupant.
    ///
    /// Out-of-range indices are ignored and return `None`.
    pub fn set_child(&mut self, index: usize, node: Option<Node<P, N>>) -> Option<Node<P, N>> {
        let slot = self.children.get_mut(index)?;
        std::mem::replace(slot, node.map(Box::new)).map(|child| *child)
    }

    /// Returns which child slots are occupied.
    pub fn occupancy(&self) -> [bool; N] {
        std::array::from_fn(|index| self.children[index].is_some())
    }

    /// Checks if this node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }

    /// Returns the number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    /// Returns the depth of this subtree (1 for a leaf node).
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .flatten()
            .map(|child| child.depth())
            .max()
            .unwrap_or(0)
    }

    /// Processes the subtree depth-first, parent before children.
    ///
    /// `visitor` sees the payload and the current context and returns the
    /// children to enter. For each returned index that is in range and
    /// occupied, `interpolate` derives the child context and the child is
    /// processed recursively. An index listed twice is entered twice.
    pub fn process_payload<V, I, C>(&mut self, visitor: &mut V, interpolate: &I, context: &C)
    where
        V: PayloadVisitor<P, C>,
        I: Interpolate<C>,
    {
        let targets = visitor.visit(&mut self.payload, context);
        for index in targets {
            if let Some(child) = self.child_mut(index) {
                let child_context = interpolate.interpolate(index, context);
                child.process_payload(visitor, interpolate, &child_context);
            }
        }
    }

    /// Processes the subtree depth-first, handing the visitor the child slots.
    ///
    /// Identical to [`process_payload`](Self::process_payload) except that
    /// the visitor receives the slot array, so it can create or destroy
    /// children before answering which ones to enter.
    pub fn process_children<V, I, C>(&mut self, visitor: &mut V, interpolate: &I, context: &C)
    where
        V: ChildrenVisitor<P, C, N>,
        I: Interpolate<C>,
    {
        let targets = visitor.visit(&mut self.children, context);
        for index in targets {
            if let Some(child) = self.child_mut(index) {
                let child_context = interpolate.interpolate(index, context);
                child.process_children(visitor, interpolate, &child_context);
            }
        }
    }

    /// Walks the subtree without modifying it, parent before children.
    ///
    /// The visitor receives each node whole. Descent follows the same rules
    /// as [`process_payload`](Self::process_payload).
    pub fn walk<V, I, C>(&self, visitor: &mut V, interpolate: &I, context: &C)
    where
        V: NodeVisitor<P, C, N>,
        I: Interpolate<C>,
    {
        let targets = visitor.visit(self, context);
        for index in targets {
            if let Some(child) = self.child(index) {
                let child_context = interpolate.interpolate(index, context);
                child.walk(visitor, interpolate, &child_context);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::visitor::{CollectingVisitor, Inherit};
    use crate::tree::ChildIndices;
    use smallvec::smallvec;

    /// Builds a node whose child slots are occupied where `layout` is non-zero.
    fn node_with_layout<const N: usize>(layout: &[usize]) -> Node<usize, N> {
        let mut node = Node::new(0);
        for (index, flag) in layout.iter().enumerate() {
            if *flag != 0 {
                node.set_child(index, Some(Node::new(0)));
            }
        }
        node
    }

    /// All layouts of four slots, each either empty or occupied.
    fn layouts() -> Vec<Vec<usize>> {
        (0..16)
            .map(|bits| (0..4).map(|i| (bits >> i) & 1).collect())
            .collect()
    }

    /// Writes `value` into every visited payload and enters `targets` at the root only.
    fn write_visitor(
        value: usize,
        targets: ChildIndices,
    ) -> impl FnMut(&mut usize, &usize) -> ChildIndices {
        move |payload: &mut usize, depth: &usize| {
            *payload = value;
            if *depth == 0 { targets.clone() } else { ChildIndices::new() }
        }
    }

    fn depth_of(_index: usize, depth: &usize) -> usize {
        depth + 1
    }

    fn check_selective_descent<const N: usize>() {
        for layout in layouts() {
            for targets in layouts() {
                let mut node = node_with_layout::<N>(&layout);
                let targets: ChildIndices = targets
                    .iter()
                    .enumerate()
                    .filter(|(_, flag)| **flag != 0)
                    .map(|(i, _)| i)
                    .collect();

                node.process_payload(&mut write_visitor(8, targets.clone()), &depth_of, &0);

                assert_eq!(*node.payload(), 8);
                for index in 0..N {
                    let Some(child) = node.child(index) else {
                        continue;
                    };
                    let expected = if targets.contains(&index) { 8 } else { 0 };
                    assert_eq!(
                        *child.payload(),
                        expected,
                        "N={N} layout={layout:?} targets={targets:?} child={index}"
                    );
                }
            }
        }
    }

    #[test]
    fn new_node_is_empty_leaf() {
        let node: Node<u8, 8> = Node::new(3);

        assert!(node.is_leaf());
        assert_eq!(*node.payload(), 3);
        assert_eq!(node.occupancy(), [false; 8]);
        assert_eq!(node.node_count(), 1);
        assert_eq!(node.depth(), 1);
    }

    #[test]
    fn zero_fan_out() {
        let mut node: Node<u8, 0> = Node::default();
        node.process_payload(
            &mut |payload: &mut u8, _: &()| -> ChildIndices {
                *payload = 1;
                smallvec![0, 1, 2]
            },
            &Inherit,
            &(),
        );

        assert_eq!(*node.payload(), 1);
        assert!(node.is_leaf());
    }

    #[test]
    fn set_child_updates_leaf_status() {
        let mut node: Node<u8, 2> = Node::new(0);

        assert!(node.set_child(1, Some(Node::new(5))).is_none());
        assert!(!node.is_leaf());
        assert_eq!(node.occupancy(), [false, true]);

        let previous = node.set_child(1, None);
        assert_eq!(previous.map(|n| *n.payload()), Some(5));
        assert!(node.is_leaf());

        assert!(node.set_child(2, Some(Node::new(1))).is_none());
        assert!(node.is_leaf());
    }

    #[test]
    fn depth_and_count() {
        let mut root: Node<u8, 4> = Node::new(0);
        let mut child = Node::new(1);
        child.set_child(3, Some(Node::new(2)));
        root.set_child(0, Some(child));
        root.set_child(2, Some(Node::new(3)));

        assert_eq!(root.depth(), 3);
        assert_eq!(root.node_count(), 4);
        assert_eq!(root.child(0).and_then(|c| c.child(3)).map(|n| *n.payload()), Some(2));
        assert!(root.child(1).is_none());
        assert!(root.child(9).is_none());
    }

    #[test]
    fn process_root_payload() {
        let mut node = node_with_layout::<4>(&[1, 0, 1, 1]);

        node.process_payload(&mut write_visitor(8, ChildIndices::new()), &depth_of, &0);

        assert_eq!(*node.payload(), 8);
        for child in node.children().iter().flatten() {
            assert_eq!(*child.payload(), 0);
        }
    }

    #[test]
    fn selective_descent_across_fan_outs() {
        check_selective_descent::<0>();
        check_selective_descent::<1>();
        check_selective_descent::<2>();
        check_selective_descent::<3>();
        check_selective_descent::<4>();
    }

    #[test]
    fn out_of_range_and_duplicate_indices() {
        let mut node = node_with_layout::<2>(&[1, 1]);
        let mut visits = vec![0; 2];

        node.process_payload(
            &mut |_: &mut usize, path: &Option<usize>| -> ChildIndices {
                match path {
                    None => smallvec![1, 7, 1, usize::MAX],
                    Some(index) => {
                        visits[*index] += 1;
                        ChildIndices::new()
                    }
                }
            },
            &|index: usize, _: &Option<usize>| Some(index),
            &None,
        );

        assert_eq!(visits, vec![0, 2]);
    }

    #[test]
    fn interpolation_reaches_grandchildren() {
        let mut root: Node<usize, 2> = Node::new(0);
        let mut child = Node::new(0);
        child.set_child(0, Some(Node::new(0)));
        root.set_child(1, Some(child));

        let mut stamp_depth = |payload: &mut usize, depth: &usize| -> ChildIndices {
            *payload = *depth;
            smallvec![0, 1]
        };
        root.process_payload(&mut stamp_depth, &depth_of, &10);

        assert_eq!(*root.payload(), 10);
        assert_eq!(root.child(1).map(|n| *n.payload()), Some(11));
        assert_eq!(root.child(1).and_then(|n| n.child(0)).map(|n| *n.payload()), Some(12));
    }

    #[test]
    fn process_children_can_create_nodes() {
        let mut root: Node<u8, 4> = Node::new(0);
        let mut grow = |children: &mut Children<u8, 4>, depth: &usize| -> ChildIndices {
            if *depth >= 2 {
                return ChildIndices::new();
            }
            children[2] = Some(Box::new(Node::new(1)));
            smallvec![2]
        };

        root.process_children(&mut grow, &depth_of, &0);

        assert_eq!(root.depth(), 3);
        assert_eq!(root.node_count(), 3);
        assert_eq!(root.occupancy(), [false, false, true, false]);
    }

    #[test]
    fn walk_sees_leaves_and_skips_unselected() {
        let mut root: Node<char, 2> = Node::new('a');
        let mut left = Node::new('b');
        left.set_child(0, Some(Node::new('c')));
        root.set_child(0, Some(left));
        root.set_child(1, Some(Node::new('d')));

        let mut seen = Vec::new();
        root.walk(
            &mut |node: &Node<char, 2>, depth: &usize| -> ChildIndices {
                seen.push((*node.payload(), *depth, node.is_leaf()));
                if *node.payload() == 'a' { smallvec![0, 1, 5] } else { ChildIndices::new() }
            },
            &depth_of,
            &0,
        );

        assert_eq!(seen, vec![('a', 0, false), ('b', 1, false), ('d', 1, true)]);
    }

    #[test]
    fn collecting_visitor_walks_preorder() {
        let mut root: Node<char, 2> = Node::new('a');
        let mut left = Node::new('b');
        left.set_child(1, Some(Node::new('c')));
        root.set_child(0, Some(left));
        root.set_child(1, Some(Node::new('d')));

        let mut visitor = CollectingVisitor::<char, 2>::new();
        root.process_payload(&mut visitor, &Inherit, &());

        assert_eq!(visitor.into_payloads(), vec!['a', 'b', 'c', 'd']);
    }
}
