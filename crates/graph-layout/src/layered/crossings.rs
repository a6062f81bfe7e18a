//! Crossing reduction over the slot grid.
//!
//! Two greedy, local heuristics: adjacent pairs swap when that strictly
//! reduces the crossings among their edges into the next level, and
//! nodes slide sideways into a neighbouring gap toward the mean column
//! of their hub neighbours. Neither promises a crossing-minimal result.

use tracing::{debug, trace};

use crate::graph::{Classification, DenseGraph};
use crate::layered::slots::SlotGrid;

/// Run the arrangement heuristics: a fixed number of adjacent-pair
/// swap sweeps, then gap-fill sweeps until one moves nothing or the
/// round cap is reached.
pub(crate) fn arrange<N: Copy + Ord>(
    grid: &mut SlotGrid,
    graph: &DenseGraph<N>,
    class: &Classification,
    max_swap_rounds: usize,
    max_gap_fill_rounds: usize,
) {
    for _ in 0..max_swap_rounds {
        swap_sweep(grid, graph, class);
    }
    for round in 0..max_gap_fill_rounds {
        if !gap_fill_sweep(grid, class) {
            debug!(round, "gap fill settled");
            break;
        }
    }
}

/// One top-to-bottom, left-to-right sweep of adjacent-pair swaps. A
/// pair is swapped iff that strictly reduces the crossing count of the
/// edges into the level below; ties keep the current order.
fn swap_sweep<N: Copy + Ord>(grid: &mut SlotGrid, graph: &DenseGraph<N>, class: &Classification) {
    for level in 0..grid.depth() {
        for slot in 1..grid.width() {
            let (Some(left), Some(node)) = (grid.row(level)[slot - 1], grid.row(level)[slot])
            else {
                continue;
            };
            let node_succs = successors_below(grid, graph, class, node, level);
            let left_succs = successors_below(grid, graph, class, left, level);

            let mut kept = 0;
            let mut swapped = 0;
            for &succ in &node_succs {
                let succ_slot = grid.index_of(succ).unwrap();
                kept += left_succs
                    .iter()
                    .filter(|&&other| grid.index_of(other).unwrap() > succ_slot)
                    .count();
                swapped += left_succs
                    .iter()
                    .filter(|&&other| grid.index_of(other).unwrap() < succ_slot)
                    .count();
            }
            if swapped < kept {
                trace!(level, slot, "swapping adjacent pair");
                grid.swap(level, slot - 1, slot);
            }
        }
    }
}

/// Hub successors of `node` placed exactly one level below `level`.
fn successors_below<N: Copy + Ord>(
    grid: &SlotGrid,
    graph: &DenseGraph<N>,
    class: &Classification,
    node: usize,
    level: usize,
) -> Vec<usize> {
    graph.succs[node]
        .iter()
        .copied()
        .filter(|&s| s != node && class.is_hub(s))
        .filter(|&s| grid.level_of(s) == Some(level + 1))
        .collect()
}

/// One gap-fill sweep. A node with exactly one adjacent gap moves into
/// it when the mean slot index of its hub neighbours in the adjacent
/// levels lies more than half a slot toward the gap. Returns whether
/// any node moved.
fn gap_fill_sweep(grid: &mut SlotGrid, class: &Classification) -> bool {
    let mut moved = false;
    for level in 0..grid.depth() {
        for slot in 1..grid.width().saturating_sub(1) {
            let Some(node) = grid.row(level)[slot] else {
                continue;
            };
            let left_gap = grid.row(level)[slot - 1].is_none();
            let right_gap = grid.row(level)[slot + 1].is_none();
            if left_gap == right_gap {
                continue;
            }

            let mut sum = 0.0;
            let mut count = 0.0;
            for &neighbor in &class.hub_neighbors[node] {
                let Some(neighbor_level) = grid.level_of(neighbor) else {
                    continue;
                };
                if neighbor_level.abs_diff(level) != 1 {
                    continue;
                }
                if let Some(neighbor_slot) = grid.index_of(neighbor) {
                    sum += neighbor_slot as f64;
                    count += 1.0;
                }
            }
            if count == 0.0 {
                continue;
            }

            let mean = sum / count;
            if mean < slot as f64 - 0.5 && left_gap {
                grid.shift(level, slot, slot - 1);
                moved = true;
            } else if mean > slot as f64 + 0.5 && right_gap {
                grid.shift(level, slot, slot + 1);
                moved = true;
            }
        }
    }
    moved
}

/// Relocate every hub without predecessors to the first row, in
/// ascending node order. Runs after the heuristics, so relocated nodes
/// keep their appended order.
pub(crate) fn pin_sources_to_first_row<N: Copy + Ord>(
    grid: &mut SlotGrid,
    graph: &DenseGraph<N>,
    class: &Classification,
) {
    for node in 0..graph.node_count() {
        if !class.is_hub(node) || !graph.preds[node].is_empty() {
            continue;
        }
        if grid.level_of(node) == Some(0) {
            continue;
        }
        trace!(node, "pinning source to first row");
        grid.relocate_to_first_row(node);
    }
}
