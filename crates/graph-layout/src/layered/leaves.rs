//! Leaf re-attachment.

use tracing::trace;

use crate::graph::{Classification, DenseGraph, NodeClass};
use crate::layered::slots::SlotGrid;

/// Attach every leaf next to its sole neighbour: directly above it
/// when the neighbour is the leaf's successor, directly below it
/// otherwise. A gap in the neighbour's column is reused; an occupied
/// slot forces a fresh column. Rows are grown on demand at the top and
/// bottom of the grid.
pub(crate) fn attach_leaves<N: Copy + Ord>(
    grid: &mut SlotGrid,
    graph: &DenseGraph<N>,
    class: &Classification,
) {
    for leaf in 0..graph.node_count() {
        if class.class[leaf] != NodeClass::Leaf {
            continue;
        }
        // exactly one incident edge, so exactly one of these lists is
        // non-empty; in a component of more than two nodes the other
        // endpoint is always an arranged hub
        let (anchor, above) = match graph.succs[leaf].first() {
            Some(&succ) => (succ, true),
            None => (graph.preds[leaf][0], false),
        };
        let mut level = grid
            .level_of(anchor)
            .expect("sole neighbour of a leaf is an arranged hub");

        if above {
            if level == 0 {
                grid.insert_row_top();
                level = 1;
            }
            level -= 1;
        } else {
            if level + 1 == grid.depth() {
                grid.push_row_bottom();
            }
            level += 1;
        }

        let slot = grid
            .index_of(anchor)
            .expect("sole neighbour of a leaf is an arranged hub");
        if grid.row(level)[slot].is_none() {
            trace!(leaf, level, slot, "leaf reuses a gap");
            grid.place(leaf, level, slot);
        } else {
            trace!(leaf, level, slot, "leaf opens a new column");
            grid.insert_column(leaf, level, slot);
        }
    }
}
