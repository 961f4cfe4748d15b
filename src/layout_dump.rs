use crate::config::LayoutConfig;
use crate::ir::{NodeId, TreeNode};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Flat, pre-order view of a laid-out tree.
#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub fingerprint: String,
    pub width: f64,
    pub height: f64,
    pub nodes: Vec<NodeDump>,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub depth: usize,
    pub leaf: bool,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LayoutDump {
    pub fn from_tree(root: &TreeNode, config: &LayoutConfig) -> Self {
        let mut nodes = Vec::with_capacity(root.node_count());
        collect(root, None, 0, &mut nodes);
        LayoutDump {
            fingerprint: config.fingerprint().to_string(),
            width: root.width,
            height: root.height,
            nodes,
        }
    }
}

fn collect(node: &TreeNode, parent: Option<&NodeId>, depth: usize, out: &mut Vec<NodeDump>) {
    out.push(NodeDump {
        id: node.id.clone(),
        name: node.name.clone(),
        parent: parent.cloned(),
        depth,
        leaf: node.is_leaf(),
        x: node.x,
        y: node.y,
        width: node.width,
        height: node.height,
    });
    for child in &node.children {
        collect(child, Some(&node.id), depth + 1, out);
    }
}

pub fn write_layout_dump(path: &Path, root: &TreeNode, config: &LayoutConfig) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_tree(root, config);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::layout_tree;

    #[test]
    fn dump_lists_every_node_with_parent() {
        let config = LayoutConfig::default();
        let mut root = TreeNode::new(1, "root").with_children(vec![
            TreeNode::new(2, "a").with_children(vec![TreeNode::new(4, "a1")]),
            TreeNode::new(3, "b"),
        ]);
        layout_tree(&mut root, &config).unwrap();
        let dump = LayoutDump::from_tree(&root, &config);
        assert_eq!(dump.nodes.len(), 4);
        assert_eq!(dump.nodes[0].parent, None);
        assert_eq!(dump.width, root.width);
        let a1 = dump.nodes.iter().find(|n| n.id == NodeId::Int(4)).unwrap();
        assert_eq!(a1.parent, Some(NodeId::Int(2)));
        assert_eq!(a1.depth, 2);
        assert!(a1.leaf);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["fingerprint"], config.fingerprint().to_string());
    }
}
