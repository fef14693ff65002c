//! Octree navigation utilities for interactive visualization.

use macroquad::prelude::*;
use ray_octree::{Aabb, Node, Octree};

use crate::{box_color, draw_aabb, leaf_shapes};

const OCTANT_KEYS: [KeyCode; 8] = [
    KeyCode::Key0,
    KeyCode::Key1,
    KeyCode::Key2,
    KeyCode::Key3,
    KeyCode::Key4,
    KeyCode::Key5,
    KeyCode::Key6,
    KeyCode::Key7,
];

/// Interactive navigator walking octant paths through an octree.
pub struct OctreeNavigator {
    path: Vec<usize>,
}

impl Default for OctreeNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl OctreeNavigator {
    /// Creates a new navigator starting at the root.
    pub fn new() -> Self {
        Self { path: Vec::new() }
    }

    /// Returns the octant indices taken from the root.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    /// Returns the current depth in the tree.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Attempts to descend into the child at `index`. Returns true if successful.
    pub fn go_child<P>(&mut self, tree: &Octree<P, f32>, index: usize) -> bool {
        let exists = self
            .current_node(tree)
            .is_some_and(|node| node.child(index).is_some());
        if exists {
            self.path.push(index);
        }
        exists
    }

    /// Navigates to the parent node. Returns true if not already at root.
    pub fn go_parent(&mut self) -> bool {
        self.path.pop().is_some()
    }

    /// Returns to the root node.
    pub fn go_root(&mut self) {
        self.path.clear();
    }

    /// Drops path steps that no longer exist, e.g. after a burn.
    pub fn revalidate<P>(&mut self, tree: &Octree<P, f32>) {
        let mut node = tree.root();
        let mut valid = 0;
        for &index in &self.path {
            match node.child(index) {
                Some(child) => {
                    node = child;
                    valid += 1;
                }
                None => break,
            }
        }
        self.path.truncate(valid);
    }

    /// Handles keyboard input for navigation.
    /// Returns true if navigation state changed.
    pub fn update<P>(&mut self, tree: &Octree<P, f32>) -> bool {
        let mut changed = false;

        for (index, key) in OCTANT_KEYS.iter().enumerate() {
            if is_key_pressed(*key) {
                changed |= self.go_child(tree, index);
            }
        }
        if is_key_pressed(KeyCode::P) {
            changed |= self.go_parent();
        }
        if is_key_pressed(KeyCode::R) && !self.path.is_empty() {
            self.go_root();
            changed = true;
        }

        changed
    }

    /// Returns the current node, if the path is still valid.
    pub fn current_node<'a, P>(&self, tree: &'a Octree<P, f32>) -> Option<&'a Node<P, 8>> {
        self.path
            .iter()
            .try_fold(tree.root(), |node, &index| node.child(index))
    }

    /// Returns the box occupied by the current node.
    pub fn current_shape<P>(&self, tree: &Octree<P, f32>) -> Aabb<f32> {
        self.path
            .iter()
            .fold(*tree.shape(), |shape, &index| shape.octant(index))
    }

    /// Draws the leaves of the current subtree and the outline of its box.
    pub fn render<P>(&self, tree: &Octree<P, f32>) {
        let Some(node) = self.current_node(tree) else {
            return;
        };
        let shape = self.current_shape(tree);

        let mut leaves = Vec::new();
        leaf_shapes(node, shape, &mut leaves);
        for leaf in &leaves {
            draw_aabb(leaf, box_color(leaf));
        }
        draw_aabb(&shape, WHITE);
    }

    /// Draws the navigation UI overlay.
    pub fn draw_ui<P>(&self, tree: &Octree<P, f32>, y_offset: f32) {
        let (nodes, occupancy) = match self.current_node(tree) {
            Some(node) => (node.node_count(), node.occupancy()),
            None => (0, [false; 8]),
        };
        let shape = self.current_shape(tree);

        let path_str = if self.path.is_empty() {
            "root".to_string()
        } else {
            self.path
                .iter()
                .map(|index| index.to_string())
                .collect::<Vec<_>>()
                .join(" -> ")
        };
        let children: String = occupancy
            .iter()
            .enumerate()
            .filter(|(_, occupied)| **occupied)
            .map(|(index, _)| format!("[{index}] "))
            .collect();

        draw_text(
            &format!("Subtree: {} nodes, diagonal {:.2}", nodes, shape.diagonal()),
            10.0,
            y_offset,
            18.0,
            WHITE,
        );
        draw_text(
            &format!("Path: {} (depth {})", path_str, self.path.len()),
            10.0,
            y_offset + 20.0,
            18.0,
            YELLOW,
        );
        draw_text(
            &format!(
                "Children: {}",
                if children.is_empty() { "(leaf)" } else { children.as_str() }
            ),
            10.0,
            y_offset + 40.0,
            18.0,
            if children.is_empty() { ORANGE } else { GREEN },
        );
        draw_text("[0-7] Child | [P]arent | [R]oot", 10.0, y_offset + 60.0, 16.0, DARKGRAY);
    }
}
