//! Degenerate, very deep trees must not exhaust the call stack.

use rntree::{NodeData, NodeId, TreeArena, TreeError};

const DEPTH: usize = 100_000;

/// Builds a unary chain bottom-up and returns (root, bottom leaf).
fn chain(arena: &mut TreeArena) -> (NodeId, NodeId) {
    let leaf = arena.insert_node(NodeData::new().with_label("w").with_error(1.0));
    let mut top = leaf;
    for _ in 0..DEPTH {
        let parent = arena.insert_node(NodeData::new().with_label("X").with_error(1.0));
        arena.connect(parent, vec![top]).unwrap();
        top = parent;
    }
    (top, leaf)
}

/// Builds a unary chain top-down, each new node linked below the last.
fn chain_top_down(arena: &mut TreeArena) -> (NodeId, NodeId) {
    let root = arena.insert_node(NodeData::new().with_label("X").with_error(1.0));
    let mut bottom = root;
    for _ in 0..DEPTH {
        let child = arena.insert_node(NodeData::new().with_label("w").with_error(1.0));
        arena.connect(bottom, vec![child]).unwrap();
        bottom = child;
    }
    (root, bottom)
}

#[test]
fn given_top_down_construction_when_linking_deep_chain_then_completes() {
    let mut arena = TreeArena::new();
    let (root, leaf) = chain_top_down(&mut arena);
    assert_eq!(arena.depth(root).unwrap(), DEPTH);
    assert_eq!(arena.leaves(root).unwrap(), vec![leaf]);
    assert_eq!(arena.root_of(leaf).unwrap(), root);
}

#[test]
fn given_deep_chain_when_linking_root_below_leaf_then_cycle_detected() {
    let mut arena = TreeArena::new();
    let (root, leaf) = chain(&mut arena);
    assert_eq!(
        arena.connect(leaf, vec![root]),
        Err(TreeError::CycleDetected(root))
    );
}

#[test]
fn given_deep_chain_when_traversed_then_completes() {
    let mut arena = TreeArena::new();
    let (root, leaf) = chain(&mut arena);

    assert_eq!(arena.depth(root).unwrap(), DEPTH);
    assert_eq!(arena.yield_labels(root).unwrap().len(), DEPTH + 1);
    assert_eq!(arena.leaves(root).unwrap(), vec![leaf]);
    assert_eq!(arena.error_sum(root).unwrap(), DEPTH as f64);
    assert_eq!(arena.root_of(leaf).unwrap(), root);
    assert_eq!(arena.iter_postorder(root).count(), DEPTH + 1);
}

#[test]
fn given_deep_chain_when_finding_parent_of_leaf_then_found() {
    let mut arena = TreeArena::new();
    let (root, leaf) = chain(&mut arena);
    let stored = arena.parent(leaf).unwrap();
    assert_eq!(arena.find_parent(leaf, root).unwrap(), stored);
}

#[test]
fn given_two_deep_chains_when_compared_then_equal() {
    let mut arena = TreeArena::new();
    let (a, _) = chain(&mut arena);
    let (b, _) = chain(&mut arena);
    assert!(arena.subtree_eq(a, &arena, b).unwrap());
}

#[test]
fn given_deep_chain_when_removed_then_arena_empty() {
    let mut arena = TreeArena::new();
    let (root, _) = chain(&mut arena);
    assert_eq!(arena.remove_subtree(root).unwrap(), DEPTH + 1);
    assert!(arena.is_empty());
}
