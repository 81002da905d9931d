//! # Kshetra-Cover: Full-Coverage Path Planning
//!
//! A coverage planner in the Spiral-STC family for mobile robots with
//! polygonal footprints and a separately mounted tool. Given a dense
//! obstacle map and a start pose, it produces an ordered sequence of
//! coverage-grid cells such that driving through them sweeps the tool over
//! every reachable free cell at least once.
//!
//! The planner spirals counter-clockwise from the start, relocates to the
//! nearest uncovered cell when a spiral exhausts, and repeats until no
//! uncovered cell remains reachable. Collision checking is footprint-based:
//! every candidate step is validated against the cells the vehicle body
//! sweeps while rotating in place and translating one cell.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kshetra_cover::{CoveragePlanner, ObstacleGrid, PlannerConfig, Pose2D, WorldPoint};
//!
//! fn main() -> kshetra_cover::Result<()> {
//!     // 6 x 4 m map at 5 cm resolution, no obstacles
//!     let map = ObstacleGrid::empty(120, 80, 0.05, WorldPoint::ZERO)?;
//!     let planner = CoveragePlanner::new(PlannerConfig::default())?;
//!     let plan = planner.plan(&map, Pose2D::new(0.8, 0.8, 0.0))?;
//!     println!(
//!         "{} cells planned, {} re-passed ({:?})",
//!         plan.metrics.visited_count, plan.metrics.multi_pass_count, plan.termination
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Coordinate Frame
//!
//! All coordinates follow the ROS REP-103 convention: X forward, Y left,
//! rotation counter-clockwise positive. Yaw angles are canonicalised to
//! `(-π, π]`.
//!
//! ## Architecture
//!
//! - [`core`]: fundamental value types ([`Cell`], [`WorldPoint`], [`Pose2D`])
//! - [`grid`]: obstacle input, coverage-grid geometry, downsampling, the
//!   per-call cell mask
//! - [`footprint`]: convex polygon rasterisation, swept-cell computation for
//!   manoeuvres, the precomputed manoeuvre catalog
//! - [`planner`]: the spiral state machine, the relocator, and the
//!   top-level [`CoveragePlanner`]
//! - [`observer`]: visualisation callbacks for the host
//!
//! The planner is strictly single-threaded and synchronous; a planning call
//! owns all of its state. Hosts cancel cooperatively through
//! [`CancelToken`].

pub mod cancel;
pub mod config;
pub mod core;
pub mod error;
pub mod footprint;
pub mod grid;
pub mod observer;
pub mod planner;

pub use cancel::CancelToken;
pub use config::PlannerConfig;
pub use core::{Cell, Pose2D, WorldPoint};
pub use error::{CoverageError, Result};
pub use footprint::{FootprintEngine, Manoeuvre, ManoeuvreCatalog, Part, RotationSense};
pub use grid::{CellMask, CellState, CoverageGrid, ObstacleGrid};
pub use observer::{CoverageObserver, NullObserver};
pub use planner::{CoverageMetrics, CoveragePlan, CoveragePlanner, Termination};
