//! Nested grid layout.
//!
//! [`grid::evaluate`] scores one ordering in one shape, [`optimize::optimize`]
//! searches orderings and shapes for one sibling set, and [`layout_tree`]
//! walks a tree twice: sizes bottom-up, then absolute positions top-down.

mod cache;
mod error;
pub mod grid;
pub mod optimize;
pub(crate) mod types;
mod walker;

pub use cache::{CacheStats, LayoutCache};
pub use error::LayoutError;
pub use grid::evaluate;
pub use optimize::{optimize, shape_candidates};
pub use types::*;
pub use walker::{LayoutEngine, MAX_TREE_DEPTH, layout_tree};
