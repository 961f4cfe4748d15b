use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable node identifier. Trees coming from a database carry integers,
/// hand-written trees usually carry strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Str(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(id) => write!(f, "{id}"),
            NodeId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Int(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Str(value.to_string())
    }
}

/// One box of the diagram. `x`, `y`, `width` and `height` are outputs of
/// [`crate::layout::layout_tree`]; they are ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub children: Vec<TreeNode>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
}

impl TreeNode {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            children: Vec::new(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_children(mut self, children: Vec<TreeNode>) -> Self {
        self.children = children;
        self
    }

    pub fn push_child(&mut self, child: TreeNode) {
        self.children.push(child);
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child_ids(&self) -> Vec<NodeId> {
        self.children.iter().map(|child| child.id.clone()).collect()
    }

    /// Drops every node deeper than `max_level`. The root is level 0, so a
    /// `max_level` of 0 leaves only the root.
    pub fn truncate_to_level(&mut self, max_level: usize) {
        if max_level == 0 {
            self.children.clear();
            return;
        }
        for child in &mut self.children {
            child.truncate_to_level(max_level - 1);
        }
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::node_count).sum::<usize>()
    }

    /// Pre-order walk carrying each node's depth.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a TreeNode, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }
}

pub fn parse_tree(input: &str) -> serde_json::Result<TreeNode> {
    serde_json::from_str(input)
}
