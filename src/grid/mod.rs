//! Occupancy input, coverage grid geometry and the per-call cell mask.

mod coverage;
mod downsample;
mod mask;
mod obstacle;

pub use coverage::CoverageGrid;
pub use downsample::downsample;
pub use mask::{CellMask, CellState};
pub use obstacle::ObstacleGrid;
