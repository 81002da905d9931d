//! Per-cell coverage state for one planning call.

use crate::core::Cell;

/// State of one coverage cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum CellState {
    /// Traversable and not yet swept by the tool.
    Free,
    /// Holds an obstacle; never traversable.
    Blocked,
    /// Was free and has been swept. Terminal state.
    Visited,
}

/// Row-major `[y][x]` mask of cell states.
///
/// Marking is monotone: `Free` cells may become `Visited`, nothing else ever
/// changes. A fresh mask is built per planning call.
#[derive(Clone, Debug)]
pub struct CellMask {
    width: usize,
    height: usize,
    states: Vec<CellState>,
}

impl CellMask {
    /// Create an all-free mask.
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            states: vec![CellState::Free; width * height],
        }
    }

    #[inline]
    fn idx(&self, cell: Cell) -> usize {
        debug_assert!(
            cell.x >= 0
                && cell.y >= 0
                && (cell.x as usize) < self.width
                && (cell.y as usize) < self.height
        );
        cell.y as usize * self.width + cell.x as usize
    }

    /// State of an in-bounds cell.
    #[inline]
    pub fn state(&self, cell: Cell) -> CellState {
        self.states[self.idx(cell)]
    }

    /// Whether the cell is free (traversable and uncovered).
    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.state(cell) == CellState::Free
    }

    /// Whether the cell holds an obstacle.
    #[inline]
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.state(cell) == CellState::Blocked
    }

    /// Whether the cell has been swept.
    #[inline]
    pub fn is_visited(&self, cell: Cell) -> bool {
        self.state(cell) == CellState::Visited
    }

    /// Mark a cell as swept. Only promotes `Free` cells; `Blocked` stays
    /// `Blocked`, `Visited` stays `Visited`.
    pub(crate) fn mark_visited(&mut self, cell: Cell) {
        let idx = self.idx(cell);
        if self.states[idx] == CellState::Free {
            self.states[idx] = CellState::Visited;
        }
    }

    /// Mark a cell as holding an obstacle. Used only while downsampling.
    pub(crate) fn mark_blocked(&mut self, cell: Cell) {
        let idx = self.idx(cell);
        self.states[idx] = CellState::Blocked;
    }

    /// Whether any free cell remains.
    pub fn has_free(&self) -> bool {
        self.states.iter().any(|s| *s == CellState::Free)
    }

    /// Number of cells in the given state.
    pub fn count(&self, state: CellState) -> usize {
        self.states.iter().filter(|s| **s == state).count()
    }

    /// All cells in the given state, in row-major order.
    pub fn cells_in_state(&self, state: CellState) -> Vec<Cell> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.states[y * self.width + x] == state {
                    cells.push(Cell::new(x as i32, y as i32));
                }
            }
        }
        cells
    }

    /// Mask width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marking_is_monotone() {
        let mut mask = CellMask::new(4, 4);
        let cell = Cell::new(1, 2);
        mask.mark_blocked(cell);
        mask.mark_visited(cell);
        assert_eq!(mask.state(cell), CellState::Blocked);

        let other = Cell::new(2, 2);
        mask.mark_visited(other);
        assert!(mask.is_visited(other));
        mask.mark_visited(other);
        assert!(mask.is_visited(other));
    }

    #[test]
    fn test_row_major_enumeration() {
        let mut mask = CellMask::new(3, 2);
        mask.mark_visited(Cell::new(2, 0));
        mask.mark_visited(Cell::new(0, 1));
        assert_eq!(mask.cells_in_state(CellState::Visited), vec![
            Cell::new(2, 0),
            Cell::new(0, 1)
        ]);
        assert_eq!(mask.count(CellState::Free), 4);
        assert!(mask.has_free());
    }
}
