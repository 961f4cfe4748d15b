use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("grid evaluation needs at least one child")]
    EmptyChildren,
    #[error("a {rows}x{cols} grid cannot hold {count} children")]
    InvalidShape {
        rows: usize,
        cols: usize,
        count: usize,
    },
    #[error("tree is deeper than {limit} levels")]
    DepthExceeded { limit: usize },
}
