//! Slot bookkeeping for one component.
//!
//! A level is a row of slots and a slot holds either a node or a gap.
//! Next to the rows the grid caches each node's (level, index). Every
//! mutation goes through the methods here so the caches can never
//! drift out of sync with the rows; re-syncing at call sites is
//! exactly the bug class this type exists to rule out.

#[derive(Debug)]
pub(crate) struct SlotGrid {
    rows: Vec<Vec<Option<usize>>>,
    level_of: Vec<Option<usize>>,
    index_of: Vec<Option<usize>>,
}

impl SlotGrid {
    /// Build ragged rows from a level assignment, nodes ascending
    /// within each row. [`center_rows`](Self::center_rows) must run
    /// before any index-based operation.
    pub fn new(levels: &[Option<usize>]) -> Self {
        let depth = levels.iter().flatten().max().map_or(0, |&m| m + 1);
        let mut rows = vec![Vec::new(); depth];
        let mut level_of = vec![None; levels.len()];
        let index_of = vec![None; levels.len()];
        for (v, l) in levels.iter().enumerate() {
            if let Some(l) = *l {
                rows[l].push(Some(v));
                level_of[v] = Some(l);
            }
        }
        let mut grid = Self {
            rows,
            level_of,
            index_of,
        };
        for l in 0..grid.rows.len() {
            grid.reindex_row(l);
        }
        grid
    }

    pub fn depth(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn row(&self, level: usize) -> &[Option<usize>] {
        &self.rows[level]
    }

    pub fn level_of(&self, node: usize) -> Option<usize> {
        self.level_of[node]
    }

    pub fn index_of(&self, node: usize) -> Option<usize> {
        self.index_of[node]
    }

    /// Pad every row to a uniform width, centered on the widest row.
    /// The widest row keeps a single leading gap.
    pub fn center_rows(&mut self) {
        let max_len = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let width = max_len + 1;
        for l in 0..self.rows.len() {
            let row = std::mem::take(&mut self.rows[l]);
            let lead = (max_len - row.len()) / 2 + 1;
            let mut padded = vec![None; lead];
            padded.extend(row);
            padded.resize(width, None);
            self.rows[l] = padded;
            self.reindex_row(l);
        }
    }

    /// Swap two slots of one row; either may be a gap.
    pub fn swap(&mut self, level: usize, a: usize, b: usize) {
        self.rows[level].swap(a, b);
        for slot in [a, b] {
            if let Some(v) = self.rows[level][slot] {
                self.index_of[v] = Some(slot);
            }
        }
    }

    /// Move a node within its row into a gap slot.
    pub fn shift(&mut self, level: usize, from: usize, to: usize) {
        debug_assert!(self.rows[level][to].is_none());
        let node = self.rows[level][from].take();
        self.rows[level][to] = node;
        if let Some(v) = node {
            self.index_of[v] = Some(to);
        }
    }

    /// Place a node into a gap slot.
    pub fn place(&mut self, node: usize, level: usize, slot: usize) {
        debug_assert!(self.rows[level][slot].is_none());
        self.rows[level][slot] = Some(node);
        self.level_of[node] = Some(level);
        self.index_of[node] = Some(slot);
    }

    /// Insert a new column at `slot`: `node` fills the new cell of
    /// `level`, every other row gets a compensating gap so that all
    /// rows stay equally wide and column-aligned.
    pub fn insert_column(&mut self, node: usize, level: usize, slot: usize) {
        for l in 0..self.rows.len() {
            let cell = if l == level { Some(node) } else { None };
            self.rows[l].insert(slot, cell);
            self.reindex_row(l);
        }
        self.level_of[node] = Some(level);
    }

    /// Prepend an empty row above level 0; every cached level moves
    /// down by one.
    pub fn insert_row_top(&mut self) {
        let width = self.width();
        self.rows.insert(0, vec![None; width]);
        for l in self.level_of.iter_mut().flatten() {
            *l += 1;
        }
    }

    /// Append an empty row below the deepest level.
    pub fn push_row_bottom(&mut self) {
        let width = self.width();
        self.rows.push(vec![None; width]);
    }

    /// Drop a node's slot from its row (closing the hole and re-padding
    /// the row at its end) and append the node to the first row,
    /// widening the grid if the first row is already full.
    pub fn relocate_to_first_row(&mut self, node: usize) {
        let (level, slot) = match (self.level_of[node], self.index_of[node]) {
            (Some(level), Some(slot)) => (level, slot),
            _ => return,
        };
        self.rows[level].remove(slot);
        self.rows[level].push(None);
        self.reindex_row(level);

        self.rows[0].push(Some(node));
        self.level_of[node] = Some(0);
        self.reindex_row(0);

        let width = self.rows[0].len();
        for row in self.rows.iter_mut().skip(1) {
            row.resize(width, None);
        }
    }

    /// Number of rows with at least one occupied slot.
    pub fn populated_rows(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.iter().any(Option::is_some))
            .count()
    }

    /// Occupied slot count of the widest row.
    pub fn occupied_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.iter().filter(|slot| slot.is_some()).count())
            .max()
            .unwrap_or(0)
    }

    fn reindex_row(&mut self, level: usize) {
        for (slot, cell) in self.rows[level].iter().enumerate() {
            if let Some(v) = *cell {
                self.index_of[v] = Some(slot);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn grid() -> SlotGrid {
        // nodes 0, 1 on level 0; node 2 on level 1; node 3 unplaced
        let mut grid = SlotGrid::new(&[Some(0), Some(0), Some(1), None]);
        grid.center_rows();
        grid
    }

    #[test]
    fn centering_pads_to_uniform_width() {
        let grid = grid();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.row(0), &[None, Some(0), Some(1)]);
        assert_eq!(grid.row(1), &[None, Some(2), None]);
        assert_eq!(grid.index_of(0), Some(1));
        assert_eq!(grid.index_of(1), Some(2));
        assert_eq!(grid.index_of(2), Some(1));
        assert_eq!(grid.level_of(3), None);
    }

    #[test]
    fn swap_updates_the_index_cache() {
        let mut grid = grid();
        grid.swap(0, 1, 2);
        assert_eq!(grid.row(0), &[None, Some(1), Some(0)]);
        assert_eq!(grid.index_of(0), Some(2));
        assert_eq!(grid.index_of(1), Some(1));
    }

    #[test]
    fn shift_moves_into_a_gap() {
        let mut grid = grid();
        grid.shift(1, 1, 2);
        assert_eq!(grid.row(1), &[None, None, Some(2)]);
        assert_eq!(grid.index_of(2), Some(2));
    }

    #[test]
    fn insert_column_keeps_rows_aligned() {
        let mut grid = grid();
        grid.insert_column(3, 1, 1);
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.row(0), &[None, None, Some(0), Some(1)]);
        assert_eq!(grid.row(1), &[None, Some(3), Some(2), None]);
        assert_eq!(grid.index_of(0), Some(2));
        assert_eq!(grid.index_of(2), Some(2));
        assert_eq!(grid.index_of(3), Some(1));
        assert_eq!(grid.level_of(3), Some(1));
    }

    #[test]
    fn row_insertion_shifts_cached_levels() {
        let mut grid = grid();
        grid.insert_row_top();
        assert_eq!(grid.depth(), 3);
        assert_eq!(grid.row(0), &[None, None, None]);
        assert_eq!(grid.level_of(0), Some(1));
        assert_eq!(grid.level_of(2), Some(2));

        grid.push_row_bottom();
        assert_eq!(grid.depth(), 4);
        assert_eq!(grid.row(3), &[None, None, None]);
    }

    #[test]
    fn relocation_appends_to_the_first_row() {
        let mut grid = grid();
        grid.relocate_to_first_row(2);
        assert_eq!(grid.row(0), &[None, Some(0), Some(1), Some(2)]);
        assert_eq!(grid.row(1), &[None, None, None, None]);
        assert_eq!(grid.level_of(2), Some(0));
        assert_eq!(grid.index_of(2), Some(3));
    }

    #[test]
    fn bookkeeping_counts_occupied_slots() {
        let grid = grid();
        assert_eq!(grid.occupied_width(), 2);
        assert_eq!(grid.populated_rows(), 2);
    }
}
