//! Dense input occupancy grid supplied by the host.

use crate::core::WorldPoint;
use crate::error::{CoverageError, Result};

/// Fine-resolution obstacle map, row-major `[y][x]`, `true` = obstacle.
#[derive(Clone, Debug)]
pub struct ObstacleGrid {
    width: usize,
    height: usize,
    resolution: f32,
    origin: WorldPoint,
    data: Vec<bool>,
}

impl ObstacleGrid {
    /// Create a grid from an existing occupancy matrix.
    pub fn new(
        width: usize,
        height: usize,
        resolution: f32,
        origin: WorldPoint,
        data: Vec<bool>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(CoverageError::GridParse(format!(
                "obstacle grid has empty dimensions ({}x{})",
                width, height
            )));
        }
        if !(resolution > 0.0) {
            return Err(CoverageError::GridParse(format!(
                "obstacle grid resolution must be positive, got {}",
                resolution
            )));
        }
        if data.len() != width * height {
            return Err(CoverageError::GridParse(format!(
                "obstacle data length {} does not match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            resolution,
            origin,
            data,
        })
    }

    /// Create an all-free grid.
    pub fn empty(width: usize, height: usize, resolution: f32, origin: WorldPoint) -> Result<Self> {
        let data = vec![false; width * height];
        Self::new(width, height, resolution, origin, data)
    }

    /// Mark one fine cell as occupied or free. Out-of-range indices are ignored.
    pub fn set_occupied(&mut self, x: usize, y: usize, occupied: bool) {
        if x < self.width && y < self.height {
            self.data[y * self.width + x] = occupied;
        }
    }

    /// Whether the fine cell `(x, y)` holds an obstacle.
    #[inline]
    pub fn occupied(&self, x: usize, y: usize) -> bool {
        self.data[y * self.width + x]
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

    /// Resolution in meters per cell.
    #[inline]
    pub fn resolution(&self) -> f32 {
        self.resolution
    }

    /// World position of the grid's lower-left corner.
    #[inline]
    pub fn origin(&self) -> WorldPoint {
        self.origin
    }

    /// Map width in meters.
    #[inline]
    pub fn width_meters(&self) -> f32 {
        self.width as f32 * self.resolution
    }

    /// Map height in meters.
    #[inline]
    pub fn height_meters(&self) -> f32 {
        self.height as f32 * self.resolution
    }

    /// World position of the centre of fine cell `(x, y)`.
    #[inline]
    pub fn cell_centre(&self, x: usize, y: usize) -> WorldPoint {
        WorldPoint::new(
            self.origin.x + (x as f32 + 0.5) * self.resolution,
            self.origin.y + (y as f32 + 0.5) * self.resolution,
        )
    }
}
