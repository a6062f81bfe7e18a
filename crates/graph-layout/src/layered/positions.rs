//! Coordinate emission.

use std::collections::HashMap;
use std::hash::Hash;

use crate::geometry::Point;
use crate::layered::slots::SlotGrid;
use crate::layered::ComponentLayout;

/// Scale the settled (level, slot) pairs into coordinates: x grows to
/// the right with the slot index, y downward with the level. A first
/// row left entirely as gaps is skipped, so the topmost occupied row
/// always sits at y zero.
pub(crate) fn emit<N: Copy + Eq + Hash>(
    grid: &SlotGrid,
    ids: &[N],
    node_separation: f32,
) -> ComponentLayout<N> {
    let offset = usize::from(grid.depth() > 0 && grid.row(0).iter().all(Option::is_none));

    let mut positions = HashMap::new();
    for (node, &id) in ids.iter().enumerate() {
        let (Some(level), Some(slot)) = (grid.level_of(node), grid.index_of(node)) else {
            continue;
        };
        let x = slot as f32 * node_separation;
        let y = (offset as f32 - level as f32) * node_separation;
        positions.insert(id, Point::new(x, y));
    }

    ComponentLayout {
        positions,
        width: grid.occupied_width(),
        height: grid.populated_rows(),
    }
}
