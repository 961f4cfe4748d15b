pub mod config;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{
    CellSizing, Config, Fingerprint, LayoutConfig, OrderingHeuristic, ScoreMetric, fingerprint,
    load_config, parse_config,
};
pub use ir::{NodeId, TreeNode, parse_tree};
pub use layout::{LayoutEngine, LayoutError, evaluate, layout_tree, optimize};
pub use render::render_svg;
pub use theme::Theme;
