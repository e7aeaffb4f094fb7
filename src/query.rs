//! Structural queries over a parse tree: yield, depth, parent search,
//! ancestors, error aggregation and leaf collection.
//!
//! Every walk uses an explicit stack; none of these recurse.

use tracing::{debug, instrument};

use crate::arena::{NodeId, TreeArena};
use crate::errors::{TreeError, TreeResult};

impl TreeArena {
    /// Labels of `idx` and all of its descendants in pre-order.
    ///
    /// Absent labels are kept as `None`, so the result always has one
    /// entry per node.
    #[instrument(level = "debug", skip(self))]
    pub fn yield_labels(&self, idx: NodeId) -> TreeResult<Vec<Option<String>>> {
        self.node(idx)?;
        Ok(self
            .iter_preorder(idx)
            .map(|(_, node)| node.data.label.clone())
            .collect())
    }

    pub fn is_leaf(&self, idx: NodeId) -> TreeResult<bool> {
        Ok(self.node(idx)?.is_leaf())
    }

    /// One child, and that child is a leaf (a POS tag above a token).
    pub fn is_pre_terminal(&self, idx: NodeId) -> TreeResult<bool> {
        match self.children(idx)? {
            [only] => self.is_leaf(*only),
            _ => Ok(false),
        }
    }

    /// Number of nodes in the subtree at `idx`, including `idx`.
    pub fn subtree_size(&self, idx: NodeId) -> TreeResult<usize> {
        self.node(idx)?;
        Ok(self.iter_preorder(idx).count())
    }

    /// Length of the longest path from `idx` down to a leaf.
    ///
    /// Leaves have depth 0, POS tags depth 1, phrasal nodes depth >= 2.
    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self, idx: NodeId) -> TreeResult<usize> {
        self.node(idx)?;
        let mut max_depth = 0;
        let mut stack = vec![(idx, 0usize)];
        while let Some((current, level)) = stack.pop() {
            max_depth = max_depth.max(level);
            if let Some(node) = self.get_node(current) {
                stack.extend(node.children.iter().map(|&c| (c, level + 1)));
            }
        }
        Ok(max_depth)
    }

    /// Distance from `idx` down to `target`.
    ///
    /// Walks upward from `target` with [`find_parent`](Self::find_parent)
    /// scoped to the subtree at `idx`, so the stored back-references are
    /// not consulted. Returns `None` when `target` is not in that subtree.
    #[instrument(level = "debug", skip(self))]
    pub fn depth_to(&self, idx: NodeId, target: NodeId) -> TreeResult<Option<usize>> {
        self.node(idx)?;
        self.node(target)?;
        if idx == target {
            return Ok(Some(0));
        }

        let mut current = match self.find_parent(target, idx)? {
            Some(p) => p,
            None => return Ok(None),
        };
        let mut depth = 1;
        while current != idx {
            current = match self.find_parent(current, idx)? {
                Some(p) => p,
                None => return Ok(None),
            };
            depth += 1;
        }
        Ok(Some(depth))
    }

    /// Structural parent of `idx` inside the subtree rooted at `root`.
    ///
    /// Found by searching `root`'s descendants, independent of the stored
    /// parent field; useful to validate or recover a stale back-reference.
    /// `None` if `idx` is `root` or does not occur below it.
    #[instrument(level = "trace", skip(self))]
    pub fn find_parent(&self, idx: NodeId, root: NodeId) -> TreeResult<Option<NodeId>> {
        self.node(idx)?;
        self.node(root)?;

        // (candidate parent, next child position to inspect)
        let mut stack = vec![(root, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (parent, pos) = *top;
            let kid = self
                .get_node(parent)
                .and_then(|node| node.children.get(pos).copied());
            match kid {
                Some(kid) => {
                    top.1 += 1;
                    if kid == idx {
                        return Ok(Some(parent));
                    }
                    stack.push((kid, 0));
                }
                None => {
                    stack.pop();
                }
            }
        }
        Ok(None)
    }

    /// The node `height` levels above `idx`, found by repeated
    /// [`find_parent`](Self::find_parent) lookups within `root`.
    ///
    /// # Errors
    /// [`TreeError::NegativeHeight`] if `height` is negative.
    #[instrument(level = "debug", skip(self))]
    pub fn ancestor(&self, idx: NodeId, height: isize, root: NodeId) -> TreeResult<Option<NodeId>> {
        if height < 0 {
            return Err(TreeError::NegativeHeight(height));
        }
        self.node(idx)?;

        let mut current = idx;
        for _ in 0..height {
            match self.find_parent(current, root)? {
                Some(p) => current = p,
                None => {
                    debug!(height, "ancestor chain ended early");
                    return Ok(None);
                }
            }
        }
        Ok(Some(current))
    }

    /// Total prediction error of the subtree at `idx`.
    ///
    /// Leaves contribute nothing; every other node contributes its own error.
    #[instrument(level = "debug", skip(self))]
    pub fn error_sum(&self, idx: NodeId) -> TreeResult<f64> {
        self.node(idx)?;
        Ok(self
            .iter_preorder(idx)
            .filter(|(_, node)| !node.is_leaf())
            .map(|(_, node)| node.data.error)
            .sum())
    }

    /// Leaves of the subtree at `idx`, left to right.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self, idx: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut list = Vec::new();
        self.leaves_into(idx, &mut list)?;
        Ok(list)
    }

    /// Appends the leaves of the subtree at `idx` to `list`, left to right.
    pub fn leaves_into(&self, idx: NodeId, list: &mut Vec<NodeId>) -> TreeResult<()> {
        self.node(idx)?;
        list.extend(
            self.iter_preorder(idx)
                .filter(|(_, node)| node.is_leaf())
                .map(|(i, _)| i),
        );
        Ok(())
    }
}
