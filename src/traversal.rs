use tracing::instrument;

use crate::arena::{NodeId, TreeArena, TreeNode};

impl TreeArena {
    /// Depth-first, left-to-right pre-order walk of the subtree at `start`.
    ///
    /// Uses an explicit stack, so arbitrarily deep trees are fine. A stale
    /// `start` yields nothing.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_preorder(&self, start: NodeId) -> TreeIterator<'_> {
        TreeIterator::new(self, start)
    }

    /// Post-order walk of the subtree at `start`: children before parents,
    /// left to right.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self, start: NodeId) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self, start)
    }
}

pub struct TreeIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a TreeArena, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                self.stack.extend(node.children.iter().rev().copied());
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a TreeArena,
    stack: Vec<(NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a TreeArena, start: NodeId) -> Self {
        Self {
            arena,
            stack: vec![(start, false)],
        }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (NodeId, &'a TreeNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if visited {
                    return Some((current_idx, node));
                }
                self.stack.push((current_idx, true));
                for &child in node.children.iter().rev() {
                    self.stack.push((child, false));
                }
            }
        }
        None
    }
}
