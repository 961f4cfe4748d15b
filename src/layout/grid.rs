//! Scores one ordering of child boxes in one grid shape.

use super::error::LayoutError;
use super::types::{GridLayout, PlacedPosition, Size};
use crate::config::{CellSizing, LayoutConfig, ScoreMetric};

/// Pixel rounding used for every reported coordinate and extent.
pub(crate) fn round_px(value: f64) -> f64 {
    value.round_ties_even()
}

/// Lays `sizes` out row-major in a `rows` x `cols` grid and scores the result
/// against the configured target aspect ratio.
pub fn evaluate(
    sizes: &[Size],
    rows: usize,
    cols: usize,
    config: &LayoutConfig,
) -> Result<GridLayout, LayoutError> {
    let count = sizes.len();
    if count == 0 {
        return Err(LayoutError::EmptyChildren);
    }
    if rows == 0 || cols == 0 || rows.saturating_mul(cols) < count {
        return Err(LayoutError::InvalidShape { rows, cols, count });
    }

    let avg_width = sizes.iter().map(|s| s.width).sum::<f64>() / count as f64;
    let avg_height = sizes.iter().map(|s| s.height).sum::<f64>() / count as f64;
    let h_gap = config.horizontal_gap_factor * avg_width;
    let v_gap = config.vertical_gap_factor * avg_height;

    let (col_widths, row_heights) = cell_extents(sizes, rows, cols, config.cell_sizing);

    let grid_width = col_widths.iter().sum::<f64>() + (cols - 1) as f64 * h_gap;
    let grid_height = row_heights.iter().sum::<f64>() + (rows - 1) as f64 * v_gap;
    let total_width = grid_width + 2.0 * config.padding;
    let total_height = grid_height + config.top_padding + config.padding;

    let deviation = score(total_width, total_height, config);

    let mut positions = Vec::with_capacity(count);
    let mut cell_y = config.top_padding;
    'rows: for (row, row_height) in row_heights.iter().enumerate() {
        let mut cell_x = config.padding;
        for (col, col_width) in col_widths.iter().enumerate() {
            let Some(child) = sizes.get(row * cols + col) else {
                break 'rows;
            };
            positions.push(PlacedPosition {
                x: round_px(cell_x + (col_width - child.width) / 2.0),
                y: round_px(cell_y + (row_height - child.height) / 2.0),
                width: round_px(child.width),
                height: round_px(child.height),
            });
            cell_x += col_width + h_gap;
        }
        cell_y += row_height + v_gap;
    }

    // A partial last row must not count its empty cells.
    let max_bottom = positions
        .iter()
        .map(PlacedPosition::bottom)
        .fold(0.0_f64, f64::max);

    Ok(GridLayout {
        rows,
        cols,
        width: round_px(total_width),
        height: round_px(max_bottom + config.padding),
        deviation,
        positions,
    })
}

/// Column widths and row heights for the chosen sizing strategy.
fn cell_extents(
    sizes: &[Size],
    rows: usize,
    cols: usize,
    sizing: CellSizing,
) -> (Vec<f64>, Vec<f64>) {
    match sizing {
        CellSizing::Uniform => {
            let cell_width = sizes.iter().map(|s| s.width).fold(0.0_f64, f64::max);
            let cell_height = sizes.iter().map(|s| s.height).fold(0.0_f64, f64::max);
            (vec![cell_width; cols], vec![cell_height; rows])
        }
        CellSizing::Adaptive => {
            let mut col_widths = vec![0.0_f64; cols];
            let mut row_heights = vec![0.0_f64; rows];
            for (idx, size) in sizes.iter().enumerate() {
                let (row, col) = (idx / cols, idx % cols);
                col_widths[col] = col_widths[col].max(size.width);
                row_heights[row] = row_heights[row].max(size.height);
            }
            (col_widths, row_heights)
        }
    }
}

fn score(total_width: f64, total_height: f64, config: &LayoutConfig) -> f64 {
    let aspect = total_width / total_height;
    let aspect_term = (aspect - config.target_aspect_ratio).powi(2);
    match config.score_metric {
        ScoreMetric::AspectRatio => aspect_term,
        ScoreMetric::Composite => {
            aspect_term + config.area_penalty_factor * total_width * total_height
        }
    }
}
