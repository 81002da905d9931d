//! Top-level coverage planning loop.

use crate::cancel::CancelToken;
use crate::config::PlannerConfig;
use crate::core::{Cell, Pose2D, normalize_angle};
use crate::error::{CoverageError, Result};
use crate::footprint::{FootprintEngine, ManoeuvreCatalog, Part};
use crate::grid::{CoverageGrid, ObstacleGrid, downsample};
use crate::observer::{CoverageObserver, NullObserver};
use std::time::Instant;

use super::{PathLog, Relocation, Relocator, Spiral};

/// How a planning call ended. `Resigned` and `Cancelled` still carry a
/// usable partial plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// Every reachable free cell was covered.
    Complete,
    /// Uncovered free cells remain, but none is reachable.
    Resigned,
    /// The host abandoned the call.
    Cancelled,
}

/// Coverage counters for one planning call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoverageMetrics {
    /// Cells appended to the output path, the seed included.
    pub visited_count: usize,
    /// Appended cells that were already covered at the time.
    pub multi_pass_count: usize,
    /// `visited_count - multi_pass_count`: distinct ground gained.
    pub accessible_count: usize,
}

/// Result of a planning call.
#[derive(Clone, Debug)]
pub struct CoveragePlan {
    /// Ordered coverage cells to drive through. Consecutive cells are
    /// 4-adjacent.
    pub path: Vec<Cell>,
    /// Coverage counters.
    pub metrics: CoverageMetrics,
    /// How the planning loop ended.
    pub termination: Termination,
}

/// Full-coverage planner in the Spiral-STC family.
///
/// Spirals counter-clockwise from the start pose, relocates to the nearest
/// uncovered cell when a spiral exhausts, and repeats until no uncovered
/// cell is reachable. One call owns all of its working state; nothing is
/// shared between calls.
pub struct CoveragePlanner {
    config: PlannerConfig,
}

impl CoveragePlanner {
    /// Create a planner, validating the configuration.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration.
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Plan full coverage of `obstacles` starting from `start`.
    pub fn plan(&self, obstacles: &ObstacleGrid, start: Pose2D) -> Result<CoveragePlan> {
        self.plan_with(obstacles, start, &CancelToken::new(), &mut NullObserver)
    }

    /// Plan with a cancellation token and a visualisation observer.
    pub fn plan_with(
        &self,
        obstacles: &ObstacleGrid,
        start: Pose2D,
        cancel: &CancelToken,
        observer: &mut dyn CoverageObserver,
    ) -> Result<CoveragePlan> {
        let started = Instant::now();

        let grid = CoverageGrid::from_obstacle_grid(obstacles, self.config.tile_size())?;
        let mut mask = downsample(obstacles, &grid)?;
        tracing::debug!(
            "Coverage grid ready: {}x{} cells at {:.3} m",
            grid.width(),
            grid.height(),
            grid.tile_size()
        );

        let start_cell = grid.world_to_cell_unbounded(start.position());
        if !grid.in_bounds(start_cell) || !mask.is_free(start_cell) {
            return Err(CoverageError::StartBlocked);
        }
        let yaw_start = normalize_angle(start.theta);

        let engine = FootprintEngine::new(
            &grid,
            self.config.vehicle_footprint.clone(),
            self.config.tool_footprint.clone(),
            self.config.manoeuvre_resolution,
        );

        // The initial footprints must fit the map and the vehicle must not
        // stand on an obstacle
        let vehicle_start = match engine.footprint_cells(start_cell, yaw_start, Part::Vehicle) {
            Ok(cells) => cells,
            Err(CoverageError::OutOfBounds) => return Err(CoverageError::StartBlocked),
            Err(e) => return Err(e),
        };
        if vehicle_start.iter().any(|c| mask.is_blocked(*c)) {
            return Err(CoverageError::StartBlocked);
        }
        match engine.footprint_cells(start_cell, yaw_start, Part::Tool) {
            Ok(_) => {}
            Err(CoverageError::OutOfBounds) => return Err(CoverageError::StartBlocked),
            Err(e) => return Err(e),
        }

        let catalog = match ManoeuvreCatalog::build(&engine, &grid) {
            Ok(catalog) => catalog,
            Err(CoverageError::OutOfBounds) => {
                return Err(CoverageError::GridParse(
                    "vehicle manoeuvres do not fit the coverage grid".into(),
                ));
            }
            Err(e) => return Err(e),
        };

        observer.grid_ready(&grid, &mask);

        let spiral = Spiral::new(
            &grid,
            &engine,
            &catalog,
            self.config.max_overlap_turn as usize,
            self.config.max_overlap_forward as usize,
        );
        let relocator = Relocator::new(&grid, &engine, self.config.max_overlap_turn as usize);

        let mut path = PathLog::new(start_cell);
        let mut termination = Termination::Complete;
        let mut spiral_count = 0usize;

        tracing::info!(
            "Starting spiral from (x={}, y={}, yaw={:.2})",
            start_cell.x,
            start_cell.y,
            yaw_start
        );
        spiral.extend(&mut path, &mut mask, yaw_start, cancel);
        observer.spiral_traced(spiral_count, &path.cells);
        spiral_count += 1;

        loop {
            if cancel.is_cancelled() {
                termination = Termination::Cancelled;
                break;
            }
            if !mask.has_free() {
                break;
            }

            let origin = path.last();
            match relocator.relocate(origin, &mut mask, cancel) {
                Relocation::Resigned => {
                    tracing::info!("Remaining free cells are unreachable, resigning");
                    termination = Termination::Resigned;
                    break;
                }
                Relocation::Cancelled => {
                    termination = Termination::Cancelled;
                    break;
                }
                Relocation::Path(trail) => {
                    tracing::debug!(
                        "Relocating {} steps from ({}, {}) to the nearest uncovered cell",
                        trail.len(),
                        origin.x,
                        origin.y
                    );
                    let segment_start = path.cells.len();
                    for cell in trail {
                        path.append(cell, &mask);
                        mask.mark_visited(cell);
                    }
                    observer.relocation_traced(&path.cells[segment_start..]);

                    let segment_start = path.cells.len();
                    spiral.extend(&mut path, &mut mask, yaw_start, cancel);
                    observer.spiral_traced(spiral_count, &path.cells[segment_start..]);
                    spiral_count += 1;
                }
            }
        }

        let metrics = CoverageMetrics {
            visited_count: path.cells.len(),
            multi_pass_count: path.multi_pass,
            accessible_count: path.cells.len() - path.multi_pass,
        };
        observer.plan_finished(&mask);
        tracing::info!(
            "Coverage plan finished in {:.1} ms: {} spirals, {} visited, {} re-passed, {} accessible ({:?})",
            started.elapsed().as_secs_f64() * 1000.0,
            spiral_count,
            metrics.visited_count,
            metrics.multi_pass_count,
            metrics.accessible_count,
            termination
        );
        Ok(CoveragePlan {
            path: path.cells,
            metrics,
            termination,
        })
    }
}
