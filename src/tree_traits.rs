use itertools::Itertools;
use termtree::Tree;
use tracing::instrument;

use crate::arena::{NodeId, TreeArena, TreeNode};
use crate::config::RenderSettings;
use crate::errors::TreeResult;

pub trait TreeNodeConvert {
    fn to_tree_string(&self, idx: NodeId) -> TreeResult<Tree<String>>;
}

fn node_text(node: &TreeNode, render: &RenderSettings) -> String {
    let mut parts = vec![node.data.to_string()];
    if render.show_gold_label {
        parts.push(format!("[gold={}]", node.data.gold_label));
    }
    if render.show_error {
        parts.push(format!("[err={}]", node.data.error));
    }
    parts.into_iter().join(" ")
}

impl TreeNodeConvert for TreeArena {
    /// Renders the subtree at `idx`, one line per node, honouring the
    /// arena's [`RenderSettings`].
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, idx: NodeId) -> TreeResult<Tree<String>> {
        self.node(idx)?;
        let render = self.render_settings();

        // post-order: a node's subtrees are the last `children.len()` entries
        let mut built: Vec<Tree<String>> = Vec::new();
        for (_, node) in self.iter_postorder(idx) {
            let live = node.children.iter().filter(|&&c| self.contains(c)).count();
            let leaves = built.split_off(built.len() - live);
            built.push(Tree::new(node_text(node, render)).with_leaves(leaves));
        }
        Ok(built.pop().unwrap_or_else(|| Tree::new(String::new())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::node::NodeData;

    fn sample(arena: &mut TreeArena) -> NodeId {
        let s = arena.insert_node(NodeData::new().with_label("S").with_error(0.5));
        let np = arena.insert_child(s, NodeData::new().with_label("NP")).unwrap();
        arena
            .insert_child(np, NodeData::new().with_label("NN").with_value("dog"))
            .unwrap();
        arena.insert_child(s, NodeData::new().with_label("VP")).unwrap();
        s
    }

    #[test]
    fn given_tree_when_rendered_then_lines_follow_preorder() {
        let mut arena = TreeArena::new();
        let s = sample(&mut arena);
        let rendered = arena.to_tree_string(s).unwrap().to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "S");
        assert!(lines[1].ends_with("NP"));
        assert!(lines[2].ends_with("NN dog"));
        assert!(lines[3].ends_with("VP"));
    }

    #[test]
    fn given_render_settings_when_rendered_then_annotations_appended() {
        let settings = Settings {
            render: RenderSettings {
                show_gold_label: true,
                show_error: true,
            },
            ..Settings::default()
        };
        let mut arena = TreeArena::with_settings(&settings);
        let s = sample(&mut arena);
        let rendered = arena.to_tree_string(s).unwrap().to_string();
        assert_eq!(rendered.lines().next(), Some("S [gold=0] [err=0.5]"));
    }
}
