//! Ordering and shape search over the grid evaluator.
//!
//! Small sibling sets are permuted exhaustively in lexicographic order starting
//! from the input order; larger sets get one heuristic ordering. In both cases
//! each ordering is tried against two column counts per row count. The first
//! arrangement found wins every exact tie, so the enumeration order is part of
//! the result.

use super::error::LayoutError;
use super::grid::evaluate;
use super::types::{GridLayout, OptimizationResult, SearchStats, Size};
use crate::config::{LayoutConfig, OrderingHeuristic};
use std::cmp::Ordering;

/// Deviations closer than this are treated as equal and fall back to area.
const DEVIATION_EPSILON: f64 = 1e-9;

pub fn optimize(sizes: &[Size], config: &LayoutConfig) -> Result<OptimizationResult, LayoutError> {
    let count = sizes.len();
    if count == 0 {
        return Err(LayoutError::EmptyChildren);
    }

    let mut stats = SearchStats::default();
    let mut best = GridLayout::unbounded(count);
    let mut best_perm: Vec<usize> = (0..count).collect();

    if count <= config.effective_permutation_threshold() {
        let mut perm: Vec<usize> = (0..count).collect();
        loop {
            let candidate = best_shape(sizes, &perm, config, &mut stats)?;
            if improves(&candidate, &best) {
                best = candidate;
                best_perm.clone_from(&perm);
            }
            if !next_permutation(&mut perm) {
                break;
            }
        }
    } else {
        let perm = heuristic_order(sizes, config.ordering_heuristic);
        let candidate = best_shape(sizes, &perm, config, &mut stats)?;
        if improves(&candidate, &best) {
            best = candidate;
            best_perm = perm;
        }
    }

    tracing::trace!(
        children = count,
        permutations = stats.permutations,
        evaluations = stats.evaluations,
        rows = best.rows,
        cols = best.cols,
        deviation = best.deviation,
        "grid search finished"
    );

    Ok(OptimizationResult {
        layout: best,
        permutation: best_perm,
        stats,
    })
}

/// `candidate` replaces `best` when it is clearly closer to the target, or
/// ties on deviation and covers strictly less area.
fn improves(candidate: &GridLayout, best: &GridLayout) -> bool {
    candidate.deviation < best.deviation
        || ((candidate.deviation - best.deviation).abs() < DEVIATION_EPSILON
            && candidate.area() < best.area())
}

/// Best grid shape for one fixed ordering.
fn best_shape(
    sizes: &[Size],
    perm: &[usize],
    config: &LayoutConfig,
    stats: &mut SearchStats,
) -> Result<GridLayout, LayoutError> {
    let ordered: Vec<Size> = perm.iter().map(|&idx| sizes[idx]).collect();
    let count = ordered.len();
    stats.permutations += 1;

    let mut best = GridLayout::unbounded(count);
    for (rows, cols) in shape_candidates(count) {
        let candidate = evaluate(&ordered, rows, cols, config)?;
        stats.evaluations += 1;
        if improves(&candidate, &best) {
            best = candidate;
        }
    }
    Ok(best)
}

/// Grid shapes tried for `count` children, in evaluation order.
///
/// For every tentative row count the balanced column count `round(n / r)` and
/// the tight one `ceil(n / r)` are taken; the row count actually used is then
/// re-derived from the column count so no row is left empty. Only these two
/// column counts are tried per row count, so some shapes are never visited.
pub fn shape_candidates(count: usize) -> Vec<(usize, usize)> {
    let mut shapes = Vec::with_capacity(count * 2);
    for rows_tentative in 1..=count {
        let balanced = (count as f64 / rows_tentative as f64).round_ties_even() as usize;
        let tight = count.div_ceil(rows_tentative);
        for cols in [balanced, tight] {
            if cols == 0 {
                continue;
            }
            let shape = (count.div_ceil(cols), cols);
            if shapes.last() != Some(&shape) {
                shapes.push(shape);
            }
        }
    }
    shapes
}

fn heuristic_order(sizes: &[Size], heuristic: OrderingHeuristic) -> Vec<usize> {
    let mut order: Vec<usize> = (0..sizes.len()).collect();
    match heuristic {
        OrderingHeuristic::InputOrder => {}
        OrderingHeuristic::AreaDescending => {
            // stable: equal areas keep input order
            order.sort_by(|&a, &b| {
                sizes[b]
                    .area()
                    .partial_cmp(&sizes[a].area())
                    .unwrap_or(Ordering::Equal)
            });
        }
    }
    order
}

/// Advances `perm` to the next lexicographic permutation. Returns `false`
/// once the last permutation has been passed.
fn next_permutation(perm: &mut [usize]) -> bool {
    let Some(pivot) = perm.windows(2).rposition(|pair| pair[0] < pair[1]) else {
        return false;
    };
    let Some(successor) = perm.iter().rposition(|&value| value > perm[pivot]) else {
        return false;
    };
    perm.swap(pivot, successor);
    perm[pivot + 1..].reverse();
    true
}
