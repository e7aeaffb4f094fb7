use std::collections::HashSet;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::config::{RenderSettings, Settings};
use crate::errors::{TreeError, TreeResult};
use crate::node::NodeData;

/// Handle of a node inside a [`TreeArena`].
///
/// Generational, so a handle to a removed node never aliases a newer one.
pub type NodeId = Index;

/// Tree node in the arena-based hierarchy structure.
#[derive(Debug)]
pub struct TreeNode {
    /// Labels and numeric state for this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for roots and detached nodes
    pub parent: Option<NodeId>,
    /// Indices of child nodes in the arena, left to right
    pub children: Vec<NodeId>,
    /// Nodes whose child list holds this node, one entry per occurrence.
    /// Differs from `parent` once `connect` moves a node without detaching it.
    holders: Vec<NodeId>,
}

impl TreeNode {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: None,
            children: Vec::new(),
            holders: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena holding any number of parse trees.
///
/// Nodes are created standalone and wired together with
/// [`connect`](TreeArena::connect); the arena owns every node, so
/// parent/child links are plain indices and never form reference cycles.
#[derive(Debug)]
pub struct TreeArena {
    arena: Arena<TreeNode>,
    render: RenderSettings,
}

impl Default for TreeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeArena {
    pub fn new() -> Self {
        Self::with_settings(&Settings::default())
    }

    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            arena: Arena::with_capacity(settings.arena_capacity),
            render: settings.render.clone(),
        }
    }

    pub fn render_settings(&self) -> &RenderSettings {
        &self.render
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn contains(&self, idx: NodeId) -> bool {
        self.arena.contains(idx)
    }

    /// Inserts a standalone node with no parent and no children.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: NodeData) -> NodeId {
        self.arena.insert(TreeNode::new(data))
    }

    /// Inserts a node and appends it as the last child of `parent`.
    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> TreeResult<NodeId> {
        self.node(parent)?;
        let mut node = TreeNode::new(data);
        node.parent = Some(parent);
        node.holders.push(parent);
        let node_idx = self.arena.insert(node);
        self.node_mut(parent)?.children.push(node_idx);
        Ok(node_idx)
    }

    pub fn get_node(&self, idx: NodeId) -> Option<&TreeNode> {
        self.arena.get(idx)
    }

    pub(crate) fn node(&self, idx: NodeId) -> TreeResult<&TreeNode> {
        self.arena.get(idx).ok_or(TreeError::NodeNotFound(idx))
    }

    pub(crate) fn node_mut(&mut self, idx: NodeId) -> TreeResult<&mut TreeNode> {
        self.arena.get_mut(idx).ok_or(TreeError::NodeNotFound(idx))
    }

    pub fn data(&self, idx: NodeId) -> TreeResult<&NodeData> {
        Ok(&self.node(idx)?.data)
    }

    pub fn data_mut(&mut self, idx: NodeId) -> TreeResult<&mut NodeData> {
        Ok(&mut self.node_mut(idx)?.data)
    }

    pub fn label(&self, idx: NodeId) -> TreeResult<Option<&str>> {
        Ok(self.data(idx)?.label.as_deref())
    }

    pub fn error(&self, idx: NodeId) -> TreeResult<f64> {
        Ok(self.data(idx)?.error)
    }

    pub fn set_error(&mut self, idx: NodeId, error: f64) -> TreeResult<()> {
        self.data_mut(idx)?.error = error;
        Ok(())
    }

    pub fn children(&self, idx: NodeId) -> TreeResult<&[NodeId]> {
        Ok(&self.node(idx)?.children)
    }

    pub fn first_child(&self, idx: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.children(idx)?.first().copied())
    }

    pub fn last_child(&self, idx: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.children(idx)?.last().copied())
    }

    /// Stored parent back-reference. This is the authoritative link; see
    /// [`find_parent`](TreeArena::find_parent) for the structural search.
    pub fn parent(&self, idx: NodeId) -> TreeResult<Option<NodeId>> {
        Ok(self.node(idx)?.parent)
    }

    /// Overwrites the stored parent without touching any child list.
    #[instrument(level = "trace", skip(self))]
    pub fn set_parent(&mut self, idx: NodeId, parent: Option<NodeId>) -> TreeResult<()> {
        if let Some(p) = parent {
            self.node(p)?;
        }
        self.node_mut(idx)?.parent = parent;
        Ok(())
    }

    /// Replaces the child list without updating the children's parents.
    ///
    /// Still rejects a list that would make the structure cyclic.
    #[instrument(level = "trace", skip(self))]
    pub fn set_children(&mut self, idx: NodeId, children: Vec<NodeId>) -> TreeResult<()> {
        self.check_acyclic(idx, &children)?;
        self.replace_children(idx, children)
    }

    /// Replaces the children of `idx` and points every child's parent at it.
    ///
    /// Children are not detached from a previous parent's child list.
    /// A child from which `idx` is already reachable is rejected with
    /// [`TreeError::CycleDetected`] and the arena is left untouched.
    #[instrument(level = "debug", skip(self))]
    pub fn connect(&mut self, idx: NodeId, children: Vec<NodeId>) -> TreeResult<()> {
        self.check_acyclic(idx, &children)?;
        for &child in &children {
            self.node_mut(child)?.parent = Some(idx);
        }
        debug!(children = children.len(), "connected children");
        self.replace_children(idx, children)
    }

    fn check_acyclic(&self, idx: NodeId, children: &[NodeId]) -> TreeResult<()> {
        self.node(idx)?;
        for &child in children {
            self.node(child)?;
            if self.reaches(child, idx) {
                return Err(TreeError::CycleDetected(child));
            }
        }
        Ok(())
    }

    /// Whether `to` is reachable from `from` through child lists.
    ///
    /// Searches down from `from` and up from `to` (via holders) in lockstep
    /// and stops as soon as either side is exhausted, so linking a fresh
    /// node above or below a large tree stays cheap.
    fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        if from == to {
            return true;
        }
        let mut down = vec![from];
        let mut down_seen = HashSet::from([from]);
        let mut up = vec![to];
        let mut up_seen = HashSet::from([to]);

        loop {
            let Some(n) = down.pop() else { return false };
            for &c in self.get_node(n).map(|n| n.children.as_slice()).unwrap_or_default() {
                if up_seen.contains(&c) {
                    return true;
                }
                if down_seen.insert(c) {
                    down.push(c);
                }
            }

            let Some(n) = up.pop() else { return false };
            for &h in self.get_node(n).map(|n| n.holders.as_slice()).unwrap_or_default() {
                if down_seen.contains(&h) {
                    return true;
                }
                if up_seen.insert(h) {
                    up.push(h);
                }
            }
        }
    }

    /// Swaps in a new child list, keeping the holder index in step.
    fn replace_children(&mut self, idx: NodeId, children: Vec<NodeId>) -> TreeResult<()> {
        let old = std::mem::replace(&mut self.node_mut(idx)?.children, children.clone());
        for child in old {
            if let Some(node) = self.arena.get_mut(child) {
                if let Some(pos) = node.holders.iter().position(|&h| h == idx) {
                    node.holders.swap_remove(pos);
                }
            }
        }
        for child in children {
            self.node_mut(child)?.holders.push(idx);
        }
        Ok(())
    }

    /// Chain of stored parents above `idx`, nearest first.
    fn stored_ancestors(&self, idx: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.node(idx)?.parent;
        while let Some(p) = current {
            // raw set_parent calls can leave a loop behind
            if !seen.insert(p) {
                break;
            }
            chain.push(p);
            current = self.get_node(p).and_then(|n| n.parent);
        }
        Ok(chain)
    }

    /// Topmost node reached by following stored parents.
    #[instrument(level = "trace", skip(self))]
    pub fn root_of(&self, idx: NodeId) -> TreeResult<NodeId> {
        Ok(self.stored_ancestors(idx)?.last().copied().unwrap_or(idx))
    }

    /// Creates a standalone copy of `idx`: labels, tokens, gold label and
    /// vectors are carried over, structure and error are not.
    #[instrument(level = "trace", skip(self))]
    pub fn copy_node(&mut self, idx: NodeId) -> TreeResult<NodeId> {
        let data = self.data(idx)?.copied();
        Ok(self.insert_node(data))
    }

    /// Removes `idx` and all of its descendants. Every surviving node that
    /// lists a removed node as a child is unlinked from it, whichever parent
    /// the stored back-reference names. Returns the number of nodes removed.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&mut self, idx: NodeId) -> TreeResult<usize> {
        self.node(idx)?;

        // a node shared by two parents shows up twice in a pre-order walk
        let mut doomed = HashSet::new();
        let mut order = Vec::new();
        for (i, _) in self.iter_preorder(idx) {
            if doomed.insert(i) {
                order.push(i);
            }
        }

        for &i in &order {
            if let Some(node) = self.arena.remove(i) {
                for holder in node.holders.into_iter().filter(|h| !doomed.contains(h)) {
                    if let Some(h) = self.arena.get_mut(holder) {
                        h.children.retain(|&c| c != i);
                    }
                }
            }
        }
        debug!(removed = order.len(), "removed subtree");
        Ok(order.len())
    }
}
