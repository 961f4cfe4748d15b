use std::path::Path;

use capgrid::layout::{LayoutEngine, shape_candidates};
use capgrid::{LayoutConfig, NodeId, Theme, TreeNode, layout_tree, parse_config, parse_tree, render_svg};

fn load_fixture(rel: &str) -> TreeNode {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_tree(&input).expect("fixture parse failed")
}

fn boxes(tree: &TreeNode) -> Vec<(NodeId, f64, f64, f64, f64)> {
    let mut out = Vec::new();
    tree.walk(&mut |node, _| out.push((node.id.clone(), node.x, node.y, node.width, node.height)));
    out.sort_by(|a, b| a.0.cmp(&b.0));
    out
}

fn assert_contained(node: &TreeNode, fixture: &str) {
    for child in &node.children {
        assert!(
            child.x >= node.x
                && child.y >= node.y
                && child.x + child.width <= node.x + node.width
                && child.y + child.height <= node.y + node.height,
            "{fixture}: {} escapes {}",
            child.id,
            node.id
        );
        assert_contained(child, fixture);
    }
}

fn assert_no_sibling_overlap(tree: &TreeNode, fixture: &str) {
    tree.walk(&mut |node, _| {
        for (i, a) in node.children.iter().enumerate() {
            for b in &node.children[i + 1..] {
                let apart = a.x + a.width <= b.x
                    || b.x + b.width <= a.x
                    || a.y + a.height <= b.y
                    || b.y + b.height <= a.y;
                assert!(apart, "{fixture}: {} overlaps {}", a.id, b.id);
            }
        }
    });
}

#[test]
fn lays_out_all_fixtures() {
    let config = LayoutConfig::default();
    // Keep this list explicit so new fixtures must be added intentionally.
    for rel in ["capability_map.json", "wide.json"] {
        let mut tree = load_fixture(rel);
        let count = tree.node_count();
        layout_tree(&mut tree, &config).expect("layout failed");
        assert_eq!(tree.node_count(), count, "{rel}: nodes lost");
        assert_eq!((tree.x, tree.y), (0.0, 0.0));
        assert_contained(&tree, rel);
        assert_no_sibling_overlap(&tree, rel);
        tree.walk(&mut |node, _| {
            if node.is_leaf() {
                assert_eq!((node.width, node.height), (120.0, 80.0), "{rel}: leaf {}", node.id);
            }
        });
    }
}

#[test]
fn repeated_runs_match_exactly() {
    let config = LayoutConfig {
        target_aspect_ratio: 1.6,
        ..LayoutConfig::default()
    };
    let mut first = load_fixture("capability_map.json");
    let mut second = load_fixture("capability_map.json");
    layout_tree(&mut first, &config).unwrap();
    layout_tree(&mut second, &config).unwrap();
    assert_eq!(boxes(&first), boxes(&second));
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn laying_out_twice_in_place_changes_nothing() {
    let config = LayoutConfig::default();
    for rel in ["capability_map.json", "wide.json"] {
        let mut tree = load_fixture(rel);
        layout_tree(&mut tree, &config).unwrap();
        let first = serde_json::to_string(&tree).unwrap();
        layout_tree(&mut tree, &config).unwrap();
        assert_eq!(serde_json::to_string(&tree).unwrap(), first, "{rel}");
    }
}

#[test]
fn wide_sibling_sets_use_a_candidate_shape() {
    let config = LayoutConfig::default();
    let tree = load_fixture("wide.json");
    let mut engine = LayoutEngine::new(&config);
    let size = engine.size_of(&tree).unwrap();
    assert!(size.width > 0.0 && size.height > 0.0);

    let mut laid_out = tree.clone();
    layout_tree(&mut laid_out, &config).unwrap();
    assert_eq!((laid_out.width, laid_out.height), (size.width, size.height));

    // Twelve children is past the exhaustive cutoff: the heuristic keeps the
    // larger (non-leaf) children first.
    let first_leaf = laid_out
        .children
        .iter()
        .position(TreeNode::is_leaf)
        .expect("fixture has leaf children");
    assert!(laid_out.children[first_leaf..].iter().all(TreeNode::is_leaf));
    assert!(!shape_candidates(12).is_empty());
}

#[test]
fn settings_file_changes_geometry_only_through_layout_fields() {
    let base = parse_config(r##"{"color_leaf": "#ABCDEF"}"##).unwrap();
    let adaptive = parse_config(r#"{"uniform_cells": false, "target_aspect_ratio": 2.0}"#).unwrap();
    assert_eq!(base.layout.fingerprint(), LayoutConfig::default().fingerprint());
    assert_ne!(adaptive.layout.fingerprint(), base.layout.fingerprint());

    let mut a = load_fixture("capability_map.json");
    let mut b = load_fixture("capability_map.json");
    layout_tree(&mut a, &base.layout).unwrap();
    layout_tree(&mut b, &adaptive.layout).unwrap();
    assert_contained(&b, "adaptive");
    assert_eq!(a.node_count(), b.node_count());
}

#[test]
fn renders_fixture_to_svg() {
    let config = LayoutConfig::default();
    let mut tree = load_fixture("capability_map.json");
    layout_tree(&mut tree, &config).unwrap();
    let svg = render_svg(&tree, &Theme::muted(), &config);
    assert!(svg.contains("<svg"));
    assert!(svg.contains("</svg>"));
    assert!(svg.contains(">Risk &amp;</text>"));
    assert_eq!(svg.matches("<rect x=").count(), tree.node_count());
}
