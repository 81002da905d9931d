//! Relocation to the nearest uncovered cell after a spiral exhausts.

use crate::cancel::CancelToken;
use crate::core::Cell;
use crate::footprint::{FootprintEngine, Part};
use crate::grid::{CellMask, CoverageGrid};

/// Outcome of a relocation attempt.
pub(crate) enum Relocation {
    /// Cells to append after the origin, ending at the accepted goal.
    Path(Vec<Cell>),
    /// No uncovered cell is reachable from the origin.
    Resigned,
    /// The host abandoned the planning call.
    Cancelled,
}

enum Wave {
    Goal(Vec<Cell>),
    Exhausted,
    Cancelled,
}

/// Uniform-cost wavefront search for the nearest uncovered cell.
///
/// The search runs on a differential-drive single-cell abstraction: the full
/// vehicle polygon is ignored while searching and re-applied only at the
/// candidate goal. Obstacles and covered cells are impassable, so relocation
/// never drives the tool back over finished ground.
pub(crate) struct Relocator<'a> {
    grid: &'a CoverageGrid,
    engine: &'a FootprintEngine<'a>,
    max_overlap: usize,
}

impl<'a> Relocator<'a> {
    pub fn new(grid: &'a CoverageGrid, engine: &'a FootprintEngine<'a>, max_overlap: usize) -> Self {
        Self {
            grid,
            engine,
            max_overlap,
        }
    }

    /// Find a path from `origin` to the nearest acceptable uncovered cell.
    /// Goals whose arrival footprint is unusable are marked covered and the
    /// search restarts from the same origin.
    pub fn relocate(
        &self,
        origin: Cell,
        mask: &mut CellMask,
        cancel: &CancelToken,
    ) -> Relocation {
        loop {
            match self.nearest_free(origin, mask, cancel) {
                Wave::Cancelled => return Relocation::Cancelled,
                Wave::Exhausted => return Relocation::Resigned,
                Wave::Goal(trail) => {
                    let goal = trail[trail.len() - 1];
                    let before = if trail.len() >= 2 {
                        trail[trail.len() - 2]
                    } else {
                        origin
                    };
                    let yaw = ((goal.y - before.y) as f32).atan2((goal.x - before.x) as f32);
                    if self.arrival_ok(goal, yaw, mask) {
                        return Relocation::Path(trail);
                    }
                    tracing::debug!(
                        "Relocation goal ({}, {}) rejected, marking covered",
                        goal.x,
                        goal.y
                    );
                    mask.mark_visited(goal);
                }
            }
        }
    }

    /// Level-order breadth-first search. Each wave holds the cells at equal
    /// step distance from the origin; the first wave that reaches uncovered
    /// ground decides the goal, tie-broken by smallest row-major index so
    /// planning stays deterministic.
    fn nearest_free(&self, origin: Cell, mask: &CellMask, cancel: &CancelToken) -> Wave {
        let width = self.grid.width();
        let size = width * self.grid.height();
        let mut seen = vec![false; size];
        let mut parent: Vec<u32> = vec![u32::MAX; size];
        seen[self.grid.index(origin) as usize] = true;

        let mut wave = vec![origin];
        while !wave.is_empty() {
            if cancel.is_cancelled() {
                return Wave::Cancelled;
            }
            let mut next_wave: Vec<Cell> = Vec::new();
            for cell in &wave {
                for neighbour in cell.neighbours_4() {
                    if !self.grid.in_bounds(neighbour) {
                        continue;
                    }
                    let idx = self.grid.index(neighbour) as usize;
                    if seen[idx] || !mask.is_free(neighbour) {
                        continue;
                    }
                    seen[idx] = true;
                    parent[idx] = self.grid.index(*cell);
                    next_wave.push(neighbour);
                }
            }
            // Every cell reached is uncovered (covered cells are impassable),
            // so the first non-empty wave holds the nearest goals
            if let Some(goal) = next_wave.iter().min_by_key(|c| self.grid.index(**c)) {
                return Wave::Goal(self.backtrack(*goal, origin, &parent));
            }
            wave = next_wave;
        }
        Wave::Exhausted
    }

    fn backtrack(&self, goal: Cell, origin: Cell, parent: &[u32]) -> Vec<Cell> {
        let width = self.grid.width() as u32;
        let mut trail = vec![goal];
        let mut current = goal;
        while current != origin {
            let idx = parent[self.grid.index(current) as usize];
            current = Cell::new((idx % width) as i32, (idx / width) as i32);
            trail.push(current);
        }
        trail.pop(); // the origin is already on the path
        trail.reverse();
        trail
    }

    /// Whether the vehicle can stand at the goal: footprint in bounds, free
    /// of obstacles, and not re-covering more than `max_overlap` cells.
    fn arrival_ok(&self, goal: Cell, yaw: f32, mask: &CellMask) -> bool {
        let Ok(cells) = self.engine.footprint_cells(goal, yaw, Part::Vehicle) else {
            return false;
        };
        let mut overlap = 0;
        for cell in &cells {
            if mask.is_blocked(*cell) {
                return false;
            }
            if mask.is_visited(*cell) {
                overlap += 1;
            }
        }
        overlap <= self.max_overlap
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorldPoint;

    fn unit_polygon() -> Vec<WorldPoint> {
        vec![
            WorldPoint::new(-0.3, -0.2),
            WorldPoint::new(0.3, -0.2),
            WorldPoint::new(0.0, 0.3),
        ]
    }

    /// Bar spanning one cell to either side along the robot's x axis.
    fn bar_polygon() -> Vec<WorldPoint> {
        vec![
            WorldPoint::new(-1.1, -0.2),
            WorldPoint::new(1.1, -0.2),
            WorldPoint::new(1.1, 0.2),
            WorldPoint::new(-1.1, 0.2),
        ]
    }

    #[test]
    fn test_tie_break_prefers_smallest_row_major_index() {
        let grid = CoverageGrid::new(3, 3, 1.0, WorldPoint::ZERO).unwrap();
        let engine = FootprintEngine::new(&grid, unit_polygon(), unit_polygon(), 8);
        let relocator = Relocator::new(&grid, &engine, 0);

        let mut mask = CellMask::new(3, 3);
        mask.mark_visited(Cell::new(1, 1));
        match relocator.relocate(Cell::new(1, 1), &mut mask, &CancelToken::new()) {
            Relocation::Path(trail) => assert_eq!(trail, vec![Cell::new(1, 0)]),
            _ => panic!("expected a relocation path"),
        }
    }

    #[test]
    fn test_resigns_when_enclosed() {
        let grid = CoverageGrid::new(3, 3, 1.0, WorldPoint::ZERO).unwrap();
        let engine = FootprintEngine::new(&grid, unit_polygon(), unit_polygon(), 8);
        let relocator = Relocator::new(&grid, &engine, 0);

        let mut mask = CellMask::new(3, 3);
        for y in 0..3 {
            for x in 0..3 {
                mask.mark_visited(Cell::new(x, y));
            }
        }
        assert!(matches!(
            relocator.relocate(Cell::new(1, 1), &mut mask, &CancelToken::new()),
            Relocation::Resigned
        ));
    }

    #[test]
    fn test_rejected_goal_is_marked_and_search_retries() {
        let grid = CoverageGrid::new(5, 5, 1.0, WorldPoint::ZERO).unwrap();
        let engine = FootprintEngine::new(&grid, bar_polygon(), unit_polygon(), 8);
        let relocator = Relocator::new(&grid, &engine, 1);

        let mut mask = CellMask::new(5, 5);
        mask.mark_visited(Cell::new(2, 2));
        // The nearest goal (2,1) is approached heading south; the bar then
        // spans (2,0)..(2,2) and (2,0) is an obstacle.
        mask.mark_blocked(Cell::new(2, 0));

        match relocator.relocate(Cell::new(2, 2), &mut mask, &CancelToken::new()) {
            Relocation::Path(trail) => assert_eq!(trail, vec![Cell::new(1, 2)]),
            _ => panic!("expected a relocation path"),
        }
        assert!(mask.is_visited(Cell::new(2, 1)));
    }

    #[test]
    fn test_cancel_aborts_search() {
        let grid = CoverageGrid::new(3, 3, 1.0, WorldPoint::ZERO).unwrap();
        let engine = FootprintEngine::new(&grid, unit_polygon(), unit_polygon(), 8);
        let relocator = Relocator::new(&grid, &engine, 0);

        let cancel = CancelToken::new();
        cancel.cancel();
        let mut mask = CellMask::new(3, 3);
        mask.mark_visited(Cell::new(1, 1));
        assert!(matches!(
            relocator.relocate(Cell::new(1, 1), &mut mask, &cancel),
            Relocation::Cancelled
        ));
    }
}
