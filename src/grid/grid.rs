use crate::error::PackError;

use super::cell::CellLink;
use super::jump_matrix::{JumpEntry, JumpMatrix};
use super::region::Region;

/// Partitions an enclosing bounding box into rectangular cells via two orthogonal CellLinks (one
/// per axis) and accelerates free-region search over them with a [`JumpMatrix`].
///
/// A Grid owns its row and column CellLinks and its JumpMatrix exclusively. It does not own the
/// rectangles placed into it — occupancy is recorded only as jump-matrix entries.
pub(crate) struct Grid {
    pub width: i64,
    pub height: i64,
    rows: CellLink,
    cols: CellLink,
    jump_matrix: JumpMatrix,
}

fn check_invariant(cond: bool) -> Result<(), PackError> {
    debug_assert!(cond, "grid split invariant violated");
    if cond {
        Ok(())
    } else {
        Err(PackError::AlgorithmFailure)
    }
}

impl Grid {
    /// Allocates a Grid whose pools can support a packing of up to `capacity - 1` rectangles.
    pub fn new(capacity: usize, width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            rows: CellLink::new(capacity, height),
            cols: CellLink::new(capacity, width),
            jump_matrix: JumpMatrix::new(capacity),
        }
    }

    /// Resets the Grid to a candidate bounding box of the given size, ready for a fresh
    /// placement attempt.
    pub fn clear(&mut self, width: i64, height: i64) {
        self.width = width;
        self.height = height;
        self.rows.set_axis_len(height);
        self.cols.set_axis_len(width);
        self.jump_matrix.clear();
    }

    pub fn row_start(&self, row_cell: usize) -> i64 {
        self.rows.start_pos(row_cell)
    }

    pub fn col_start(&self, col_cell: usize) -> i64 {
        self.cols.start_pos(col_cell)
    }

    /// Locates the first (leftmost, then topmost) free block of cells into which a `width x
    /// height` rectangle fits, aligned to the block's top-left corner.
    ///
    /// Returns `(None, delta)` on failure, where `delta` is the smallest amount by which some
    /// near-miss would have needed the grid to grow taller to succeed, clamped to the grid's
    /// current height and floored at 1. Mutates the jump matrix even on failure (path
    /// compression runs as a side effect of the search) — callers must not treat this as a
    /// read-only query.
    pub fn find_region(&mut self, width: i64, height: i64) -> (Option<Region>, i64) {
        let mut delta = self.height;
        let mut col_cell_start = self.cols.head();

        loop {
            let rec_col_end_pos = self.cols.start_pos(col_cell_start) + width;
            if rec_col_end_pos > self.width {
                break;
            }

            if let Some(region) = self.scan_rows(col_cell_start, height, rec_col_end_pos, &mut delta) {
                return (Some(region), delta);
            }

            match self.cols.next(col_cell_start) {
                Some(next) => col_cell_start = next,
                None => break,
            }
        }

        (None, delta.max(1))
    }

    /// Scans row ranges for a single starting column. Returns a hit if the width is also
    /// satisfied somewhere along the way; otherwise updates `delta` for any near miss encountered
    /// and returns `None`.
    fn scan_rows(
        &mut self,
        col_cell_start: usize,
        height: i64,
        rec_col_end_pos: i64,
        delta: &mut i64,
    ) -> Option<Region> {
        let mut row_cell_start = self.rows.head();
        let mut row_cell = row_cell_start;
        let mut rec_row_end_pos = self.rows.start_pos(row_cell_start) + height;
        let mut jump_first: Option<usize> = None;
        let col_jump_index = self.cols.jump_index_of(col_cell_start);

        loop {
            let row_jump_index = self.rows.jump_index_of(row_cell);
            match self.jump_matrix.get(row_jump_index, col_jump_index) {
                JumpEntry::ColFull => return None,
                JumpEntry::Jump(target) => {
                    match jump_first {
                        None => jump_first = Some(row_cell),
                        Some(first) => {
                            let first_jump_index = self.rows.jump_index_of(first);
                            self.jump_matrix
                                .set(first_jump_index, col_jump_index, JumpEntry::Jump(target));
                        }
                    }
                    row_cell_start = target;
                    row_cell = target;
                    rec_row_end_pos = self.rows.start_pos(target) + height;
                }
                JumpEntry::Empty => {
                    jump_first = None;
                    if self.rows.end_pos_of(row_cell) < rec_row_end_pos {
                        match self.rows.next(row_cell) {
                            Some(next) => row_cell = next,
                            None => {
                                *delta = (*delta).min(rec_row_end_pos - self.height);
                                return None;
                            }
                        }
                    } else if let Some(col_cell) =
                        self.walk_columns(row_cell_start, col_cell_start, rec_col_end_pos)
                    {
                        return Some(Region {
                            row_cell_start,
                            row_cell,
                            row_end_pos: rec_row_end_pos,
                            col_cell_start,
                            col_cell,
                            col_end_pos: rec_col_end_pos,
                        });
                    } else {
                        // Column walk rejected this row range: abandon the starting column
                        // entirely rather than retrying a taller row range.
                        return None;
                    }
                }
            }
        }
    }

    /// Walks forward from `col_cell_start`, checking that every cell under `row_cell_start` is
    /// free, until the accumulated column range reaches `rec_col_end_pos`. Returns the
    /// terminating column cell on success.
    fn walk_columns(
        &self,
        row_cell_start: usize,
        col_cell_start: usize,
        rec_col_end_pos: i64,
    ) -> Option<usize> {
        let row_jump_index = self.rows.jump_index_of(row_cell_start);
        let mut col_cell = col_cell_start;
        loop {
            let col_jump_index = self.cols.jump_index_of(col_cell);
            match self.jump_matrix.get(row_jump_index, col_jump_index) {
                JumpEntry::Empty => {
                    if self.cols.end_pos_of(col_cell) >= rec_col_end_pos {
                        return Some(col_cell);
                    }
                    match self.cols.next(col_cell) {
                        Some(next) => col_cell = next,
                        None => return None,
                    }
                }
                JumpEntry::Jump(_) | JumpEntry::ColFull => return None,
            }
        }
    }

    /// Commits a [`Region`] found by [`Self::find_region`]: cuts the row/column CellLinks at the
    /// region's far edges if needed, duplicates the affected jump-matrix row/column, and marks
    /// the region's L-shaped anchor (top row across all spanned columns, leftmost column across
    /// all spanned rows) as occupied.
    pub fn split(&mut self, region: &Region) -> Result<(), PackError> {
        let row_cell = if region.row_end_pos < self.rows.end_pos_of(region.row_cell) {
            let (src, dest) = self.rows.cut(region.row_cell, region.row_end_pos);
            self.jump_matrix.copy_row(src, dest, self.cols.cell_count());
            region.row_cell
        } else {
            region.row_cell
        };

        let col_cell = if region.col_end_pos < self.cols.end_pos_of(region.col_cell) {
            let (src, dest) = self.cols.cut(region.col_cell, region.col_end_pos);
            self.jump_matrix.copy_col(src, dest, self.rows.cell_count());
            region.col_cell
        } else {
            region.col_cell
        };

        let jump_target = match self.rows.next(row_cell) {
            None => JumpEntry::ColFull,
            Some(next) => JumpEntry::Jump(next),
        };

        let col_cell_start_jump = self.cols.jump_index_of(region.col_cell_start);
        let mut rc = region.row_cell_start;
        loop {
            let row_jump_index = self.rows.jump_index_of(rc);
            check_invariant(self.jump_matrix.get(row_jump_index, col_cell_start_jump) == JumpEntry::Empty)?;
            self.jump_matrix.set(row_jump_index, col_cell_start_jump, jump_target);
            if rc == row_cell {
                break;
            }
            rc = self
                .rows
                .next(rc)
                .ok_or(PackError::AlgorithmFailure)?;
        }

        if region.col_cell_start != col_cell {
            let row_cell_start_jump = self.rows.jump_index_of(region.row_cell_start);
            let mut cc = self
                .cols
                .next(region.col_cell_start)
                .ok_or(PackError::AlgorithmFailure)?;
            loop {
                let col_jump_index = self.cols.jump_index_of(cc);
                check_invariant(
                    self.jump_matrix.get(row_cell_start_jump, col_jump_index) == JumpEntry::Empty,
                )?;
                self.jump_matrix
                    .set(row_cell_start_jump, col_jump_index, jump_target);
                if cc == col_cell {
                    break;
                }
                cc = self.cols.next(cc).ok_or(PackError::AlgorithmFailure)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_rectangle_fills_grid() {
        let mut grid = Grid::new(4, 10, 10);
        let (region, _delta) = grid.find_region(10, 10);
        let region = region.expect("10x10 rectangle should fit exactly in a 10x10 grid");
        assert_eq!(grid.col_start(region.col_cell_start), 0);
        assert_eq!(grid.row_start(region.row_cell_start), 0);
        grid.split(&region).unwrap();
    }

    #[test]
    fn two_rectangles_side_by_side() {
        let mut grid = Grid::new(4, 140, 50);
        let (r1, _) = grid.find_region(100, 30);
        let r1 = r1.unwrap();
        assert_eq!((grid.col_start(r1.col_cell_start), grid.row_start(r1.row_cell_start)), (0, 0));
        grid.split(&r1).unwrap();

        let (r2, _) = grid.find_region(40, 50);
        let r2 = r2.unwrap();
        assert_eq!((grid.col_start(r2.col_cell_start), grid.row_start(r2.row_cell_start)), (100, 0));
        grid.split(&r2).unwrap();
    }

    #[test]
    fn rectangle_too_wide_reports_failure_with_positive_delta() {
        let mut grid = Grid::new(4, 10, 10);
        let (region, delta) = grid.find_region(20, 5);
        assert!(region.is_none());
        assert!(delta >= 1);
    }

    #[test]
    fn four_quadrant_grid_packs_without_overlap() {
        let mut grid = Grid::new(8, 100, 100);
        let mut seen = Vec::new();
        for _ in 0..4 {
            let (region, _delta) = grid.find_region(50, 50);
            let region = region.expect("quadrant should fit");
            let pos = (grid.col_start(region.col_cell_start), grid.row_start(region.row_cell_start));
            assert!(!seen.contains(&pos), "duplicate position {:?}", pos);
            seen.push(pos);
            grid.split(&region).unwrap();
        }
        assert!(seen.contains(&(0, 0)));
        assert!(seen.contains(&(50, 0)));
        assert!(seen.contains(&(0, 50)));
        assert!(seen.contains(&(50, 50)));
        let (region, _) = grid.find_region(1, 1);
        assert!(region.is_none(), "grid should be fully occupied");
    }

    #[test]
    fn clear_allows_reuse_of_grid() {
        let mut grid = Grid::new(4, 10, 10);
        let (region, _) = grid.find_region(10, 10);
        grid.split(&region.unwrap()).unwrap();
        assert!(grid.find_region(1, 1).0.is_none());

        grid.clear(10, 10);
        let (region, _) = grid.find_region(10, 10);
        assert!(region.is_some());
    }
}
