//! Error types for the coverage planner.

use thiserror::Error;

/// Coverage planner error type
#[derive(Error, Debug)]
pub enum CoverageError {
    /// The start cell or the initial footprint lies in an obstacle or
    /// outside the map.
    #[error("start pose is blocked or outside the map")]
    StartBlocked,

    /// The obstacle map could not be turned into a usable coverage grid.
    #[error("could not parse grid: {0}")]
    GridParse(String),

    /// A footprint polygon has fewer than three distinct points.
    #[error("degenerate footprint: {0}")]
    DegenerateFootprint(String),

    /// A footprint leaves the coverage grid. Recovered internally by
    /// rejecting the manoeuvre that produced it.
    #[error("footprint leaves the coverage grid")]
    OutOfBounds,

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for CoverageError {
    fn from(e: toml::de::Error) -> Self {
        CoverageError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CoverageError {
    fn from(e: std::io::Error) -> Self {
        CoverageError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoverageError>;
