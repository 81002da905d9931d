//! Coverage planning demo: plans a synthetic room and renders the result.
//!
//! Usage: `coverage_demo [config.toml]`
//!
//! Builds a rectangular map with a few obstacles, runs the planner and
//! prints the covered grid plus metrics. `RUST_LOG=debug` shows the
//! planner's progress.

use std::path::Path;

use kshetra_cover::{
    CancelToken, Cell, CellMask, CellState, CoverageObserver, CoveragePlanner, ObstacleGrid,
    PlannerConfig, Pose2D, Result, WorldPoint,
};

/// Keeps the final coverage mask for rendering.
#[derive(Default)]
struct MaskCapture {
    mask: Option<CellMask>,
    spirals: usize,
}

impl CoverageObserver for MaskCapture {
    fn spiral_traced(&mut self, _index: usize, cells: &[Cell]) {
        if !cells.is_empty() {
            self.spirals += 1;
        }
    }

    fn plan_finished(&mut self, mask: &CellMask) {
        self.mask = Some(mask.clone());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coverage_demo=info".parse().unwrap())
                .add_directive("kshetra_cover=info".parse().unwrap()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = if args.len() > 1 {
        tracing::info!("loading configuration from {}", args[1]);
        PlannerConfig::load(Path::new(&args[1]))?
    } else {
        PlannerConfig::default()
    };

    // 12 x 9 m room at 5 cm resolution with a pillar and a wall stub
    let mut map = ObstacleGrid::empty(240, 180, 0.05, WorldPoint::ZERO)?;
    for y in 60..100 {
        for x in 120..150 {
            map.set_occupied(x, y, true);
        }
    }
    for y in 140..180 {
        for x in 60..70 {
            map.set_occupied(x, y, true);
        }
    }

    let start = Pose2D::new(1.0, 1.0, 0.0);
    let planner = CoveragePlanner::new(config)?;
    let mut capture = MaskCapture::default();
    let plan = planner.plan_with(&map, start, &CancelToken::new(), &mut capture)?;

    if let Some(mask) = &capture.mask {
        render(mask, &plan.path);
    }
    println!(
        "{:?}: {} cells planned in {} spirals, {} re-passed, {} newly covered",
        plan.termination,
        plan.metrics.visited_count,
        capture.spirals,
        plan.metrics.multi_pass_count,
        plan.metrics.accessible_count
    );
    Ok(())
}

/// ASCII rendering: `#` obstacle, `*` covered, `.` free, `S` the start cell.
fn render(mask: &CellMask, path: &[Cell]) {
    let start = path.first().copied();
    for y in (0..mask.height() as i32).rev() {
        let mut line = String::with_capacity(mask.width());
        for x in 0..mask.width() as i32 {
            let cell = Cell::new(x, y);
            let glyph = if start == Some(cell) {
                'S'
            } else {
                match mask.state(cell) {
                    CellState::Blocked => '#',
                    CellState::Visited => '*',
                    CellState::Free => '.',
                }
            };
            line.push(glyph);
        }
        println!("{}", line);
    }
}
