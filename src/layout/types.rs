use serde::Serialize;

/// Minimum bounding box of a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// Placement of one child relative to its parent's origin, in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlacedPosition {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacedPosition {
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn overlaps(&self, other: &PlacedPosition) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridLayout {
    pub rows: usize,
    pub cols: usize,
    pub width: f64,
    pub height: f64,
    pub deviation: f64,
    /// One entry per child, in the order the sizes were evaluated.
    pub positions: Vec<PlacedPosition>,
}

impl GridLayout {
    /// Placeholder every real candidate beats.
    pub(crate) fn unbounded(count: usize) -> Self {
        Self {
            rows: 1,
            cols: count,
            width: f64::INFINITY,
            height: f64::INFINITY,
            deviation: f64::INFINITY,
            positions: Vec::new(),
        }
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    /// Child orderings scored.
    pub permutations: usize,
    /// Grid shapes evaluated across all orderings.
    pub evaluations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimizationResult {
    pub layout: GridLayout,
    /// Original child indices in winning order.
    pub permutation: Vec<usize>,
    pub stats: SearchStats,
}
