//! Visitor traits driving node traversal.
//!
//! A traversal is steered by two strategies: a visitor that inspects a node
//! and answers which children to descend into, and an interpolator that
//! derives each child's traversal context from its parent's. Nodes know
//! nothing about what the context means.

use super::node::{Children, Node};
use super::ChildIndices;

/// Visits node payloads during [`Node::process_payload`](super::Node::process_payload).
pub trait PayloadVisitor<P, C> {
    /// Called once per visited node, parent before children.
    ///
    /// Returns the indices of the children to descend into. Indices that
    /// are out of range or refer to empty slots are skipped.
    fn visit(&mut self, payload: &mut P, context: &C) -> ChildIndices;
}

/// Visits child slots during [`Node::process_children`](super::Node::process_children).
///
/// Unlike [`PayloadVisitor`], the visitor receives the slot array itself and
/// may create or destroy children before answering which ones to enter.
pub trait ChildrenVisitor<P, C, const N: usize> {
    /// Called once per visited node, parent before children.
    fn visit(&mut self, children: &mut Children<P, N>, context: &C) -> ChildIndices;
}

/// Inspects whole nodes during [`Node::walk`](super::Node::walk).
///
/// The visitor sees the node read-only, including its child slots, so it
/// can tell leaves from inner nodes before answering which children to enter.
pub trait NodeVisitor<P, C, const N: usize> {
    /// Called once per visited node, parent before children.
    fn visit(&mut self, node: &Node<P, N>, context: &C) -> ChildIndices;
}

/// Derives the traversal context of a child from its parent's.
///
/// Called once for every child that is entered, so it must depend only on
/// the index and the parent context.
pub trait Interpolate<C> {
    /// Returns the context for the child at `index`.
    fn interpolate(&self, index: usize, context: &C) -> C;
}

impl<P, C, F> PayloadVisitor<P, C> for F
where
    F: FnMut(&mut P, &C) -> ChildIndices,
{
    fn visit(&mut self, payload: &mut P, context: &C) -> ChildIndices {
        self(payload, context)
    }
}

impl<P, C, F, const N: usize> ChildrenVisitor<P, C, N> for F
where
    F: FnMut(&mut Children<P, N>, &C) -> ChildIndices,
{
    fn visit(&mut self, children: &mut Children<P, N>, context: &C) -> ChildIndices {
        self(children, context)
    }
}

impl<P, C, F, const N: usize> NodeVisitor<P, C, N> for F
where
    F: FnMut(&Node<P, N>, &C) -> ChildIndices,
{
    fn visit(&mut self, node: &Node<P, N>, context: &C) -> ChildIndices {
        self(node, context)
    }
}

impl<C, F> Interpolate<C> for F
where
    F: Fn(usize, &C) -> C,
{
    fn interpolate(&self, index: usize, context: &C) -> C {
        self(index, context)
    }
}

/// Interpolator that hands every child a copy of the parent context.
#[derive(Debug, Clone, Copy, Default)]
pub struct Inherit;

impl<C: Clone> Interpolate<C> for Inherit {
    fn interpolate(&self, _index: usize, context: &C) -> C {
        context.clone()
    }
}

/// Visitor that records every visited payload and descends into all `N` children.
#[derive(Debug)]
pub struct CollectingVisitor<P, const N: usize> {
    collected: Vec<P>,
}

impl<P, const N: usize> Default for CollectingVisitor<P, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P, const N: usize> CollectingVisitor<P, N> {
    /// Creates a new empty collecting visitor.
    pub fn new() -> Self {
        Self {
            collected: Vec::new(),
        }
    }

    /// Returns the collected payloads in visiting order.
    pub fn into_payloads(self) -> Vec<P> {
        self.collected
    }

    /// Returns a reference to the collected payloads.
    pub fn payloads(&self) -> &[P] {
        &self.collected
    }
}

impl<P: Clone, C, const N: usize> PayloadVisitor<P, C> for CollectingVisitor<P, N> {
    fn visit(&mut self, payload: &mut P, _context: &C) -> ChildIndices {
        self.collected.push(payload.clone());
        (0..N).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn closures_are_payload_visitors() {
        let mut seen = 0;
        let mut visitor = |payload: &mut u32, context: &u32| -> ChildIndices {
            *payload += context;
            seen += 1;
            smallvec![1, 2]
        };

        let mut payload = 1;
        let indices = PayloadVisitor::visit(&mut visitor, &mut payload, &5);

        assert_eq!(payload, 6);
        assert_eq!(indices.as_slice(), &[1, 2]);
        assert_eq!(seen, 1);
    }

    #[test]
    fn closures_are_interpolators() {
        let depth = |_index: usize, parent: &u32| parent + 1;
        assert_eq!(depth.interpolate(3, &4), 5);
    }

    #[test]
    fn inherit_clones_context() {
        assert_eq!(Inherit.interpolate(7, &String::from("ctx")), "ctx");
    }

    #[test]
    fn collecting_visitor_collects() {
        let mut visitor = CollectingVisitor::<char, 4>::new();
        assert!(visitor.payloads().is_empty());

        let indices = PayloadVisitor::<_, ()>::visit(&mut visitor, &mut 'a', &());
        PayloadVisitor::<_, ()>::visit(&mut visitor, &mut 'b', &());

        assert_eq!(indices.as_slice(), &[0, 1, 2, 3]);

        assert_eq!(visitor.into_payloads(), vec!['a', 'b']);
    }
}
