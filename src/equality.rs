//! Local structural equality for subtrees.
//!
//! Two subtrees are equal when, position by position, their node payloads
//! match and their child lists have the same length. Parents are never
//! consulted, so comparing deep trees costs O(size) and terminates.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::instrument;

use crate::arena::{NodeId, TreeArena};
use crate::errors::TreeResult;

impl TreeArena {
    /// Compares the subtree at `idx` with the subtree at `other_idx` in
    /// `other` (which may be `self`).
    #[instrument(level = "debug", skip(self, other))]
    pub fn subtree_eq(&self, idx: NodeId, other: &TreeArena, other_idx: NodeId) -> TreeResult<bool> {
        self.node(idx)?;
        other.node(other_idx)?;

        let mut stack = vec![(idx, other_idx)];
        while let Some((a, b)) = stack.pop() {
            let left = self.node(a)?;
            let right = other.node(b)?;
            if left.data != right.data || left.children.len() != right.children.len() {
                return Ok(false);
            }
            stack.extend(left.children.iter().copied().zip(right.children.iter().copied()));
        }
        Ok(true)
    }

    /// Hash of the subtree at `idx`, consistent with [`subtree_eq`](Self::subtree_eq).
    #[instrument(level = "debug", skip(self))]
    pub fn subtree_hash(&self, idx: NodeId) -> TreeResult<u64> {
        self.node(idx)?;
        let mut hasher = DefaultHasher::new();
        for (_, node) in self.iter_preorder(idx) {
            node.data.hash(&mut hasher);
            node.children.len().hash(&mut hasher);
        }
        Ok(hasher.finish())
    }
}
