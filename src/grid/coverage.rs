//! Coarse coverage grid geometry.

use crate::core::{Cell, WorldPoint};
use crate::error::{CoverageError, Result};

use super::obstacle::ObstacleGrid;

/// Geometry of the coverage grid the planner operates on.
///
/// Cells are squares of `tile_size` meters; cell `(x, y)` covers the area
/// from `origin + (x, y) * tile_size` to `origin + (x+1, y+1) * tile_size`.
#[derive(Clone, Copy, Debug)]
pub struct CoverageGrid {
    width: usize,
    height: usize,
    tile_size: f32,
    origin: WorldPoint,
}

impl CoverageGrid {
    /// Create a coverage grid with explicit dimensions.
    pub fn new(width: usize, height: usize, tile_size: f32, origin: WorldPoint) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoverageError::GridParse(format!(
                "coverage grid has empty dimensions ({}x{})",
                width, height
            )));
        }
        if !(tile_size > 0.0) {
            return Err(CoverageError::GridParse(format!(
                "coverage tile size must be positive, got {}",
                tile_size
            )));
        }
        Ok(Self {
            width,
            height,
            tile_size,
            origin,
        })
    }

    /// Derive the coverage grid that tiles an obstacle map, inheriting its
    /// origin. Dimensions round up so the whole map is covered.
    pub fn from_obstacle_grid(obstacles: &ObstacleGrid, tile_size: f32) -> Result<Self> {
        if !(tile_size > 0.0) {
            return Err(CoverageError::GridParse(format!(
                "coverage tile size must be positive, got {}",
                tile_size
            )));
        }
        let width = (obstacles.width_meters() / tile_size).ceil() as usize;
        let height = (obstacles.height_meters() / tile_size).ceil() as usize;
        Self::new(width, height, tile_size, obstacles.origin())
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell side length in meters.
    #[inline]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// World position of the grid's lower-left corner.
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// World position of the centre of a cell.
    #[inline]
    pub fn cell_to_world(&self, cell: Cell) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (cell.x as f32 + 0.5) * self.tile_size,
            self.origin.y + (cell.y as f32 + 0.5) * self.tile_size,
        )
    }

    /// Cell containing a world point, by floor division. Deliberately does
    /// not clamp: callers check bounds explicitly, because a clamped result
    /// silently miscomputes near the map edges.
    #[inline]
    pub fn world_to_cell_unbounded(&self, point: WorldPoint) -> Cell {
        Cell::new(
            ((point.x - self.origin.x) / self.tile_size).floor() as i32,
            ((point.y - self.origin.y) / self.tile_size).floor() as i32,
        )
    }

    /// Whether a cell lies inside the grid.
    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && (cell.x as usize) < self.width && (cell.y as usize) < self.height
    }

    /// Row-major packed index of an in-bounds cell.
    #[inline]
    pub fn index(&self, cell: Cell) -> u32 {
        debug_assert!(self.in_bounds(cell));
        cell.y as u32 * self.width as u32 + cell.x as u32
    }
}
