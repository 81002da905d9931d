//! Downsampling of the fine obstacle map onto the coverage grid.

use crate::error::{CoverageError, Result};

use super::coverage::CoverageGrid;
use super::mask::CellMask;
use super::obstacle::ObstacleGrid;

/// Build the initial coverage mask from the obstacle map.
///
/// A coverage cell is blocked when any fine cell whose centre falls inside
/// it is occupied. Fine cell centres are the natural sample points of the
/// downsampling, so a coverage cell that merely touches an obstacle cell's
/// corner stays free.
pub fn downsample(obstacles: &ObstacleGrid, grid: &CoverageGrid) -> Result<CellMask> {
    let mut mask = CellMask::new(grid.width(), grid.height());

    for y in 0..obstacles.height() {
        for x in 0..obstacles.width() {
            if !obstacles.occupied(x, y) {
                continue;
            }
            let cell = grid.world_to_cell_unbounded(obstacles.cell_centre(x, y));
            if grid.in_bounds(cell) {
                mask.mark_blocked(cell);
            }
        }
    }

    if !mask.has_free() {
        return Err(CoverageError::GridParse(
            "downsampled coverage grid has no free cells".into(),
        ));
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Cell, WorldPoint};

    #[test]
    fn test_occupied_centre_blocks_tile() {
        // 10x10 fine cells of 0.1 m, 1.0 m tiles -> one coverage cell
        // per 10x10 fine block
        let mut obstacles = ObstacleGrid::empty(20, 20, 0.1, WorldPoint::ZERO).unwrap();
        obstacles.set_occupied(13, 4, true);
        let grid = CoverageGrid::from_obstacle_grid(&obstacles, 1.0).unwrap();
        let mask = downsample(&obstacles, &grid).unwrap();

        assert!(mask.is_blocked(Cell::new(1, 0)));
        assert!(mask.is_free(Cell::new(0, 0)));
        assert!(mask.is_free(Cell::new(1, 1)));
        assert_eq!(mask.count(crate::grid::CellState::Blocked), 1);
    }

    #[test]
    fn test_all_blocked_fails() {
        let data = vec![true; 16];
        let obstacles = ObstacleGrid::new(4, 4, 0.5, WorldPoint::ZERO, data).unwrap();
        let grid = CoverageGrid::from_obstacle_grid(&obstacles, 1.0).unwrap();
        assert!(matches!(
            downsample(&obstacles, &grid),
            Err(CoverageError::GridParse(_))
        ));
    }
}
