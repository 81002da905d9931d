//! Greedy counter-clockwise spiral extension.

use crate::cancel::CancelToken;
use crate::core::{Cell, normalize_angle};
use crate::footprint::{FootprintEngine, Manoeuvre, ManoeuvreCatalog, Part, RotationSense};
use crate::grid::{CellMask, CoverageGrid};
use std::f32::consts::FRAC_PI_2;

use super::PathLog;

/// Extends a path one cell at a time, preferring left over forward over
/// right, until no direction is admissible. The preference order is what
/// turns the greedy walk into an outward counter-clockwise spiral.
pub(crate) struct Spiral<'a> {
    grid: &'a CoverageGrid,
    engine: &'a FootprintEngine<'a>,
    catalog: &'a ManoeuvreCatalog,
    max_overlap_turn: usize,
    max_overlap_forward: usize,
}

impl<'a> Spiral<'a> {
    pub fn new(
        grid: &'a CoverageGrid,
        engine: &'a FootprintEngine<'a>,
        catalog: &'a ManoeuvreCatalog,
        max_overlap_turn: usize,
        max_overlap_forward: usize,
    ) -> Self {
        Self {
            grid,
            engine,
            catalog,
            max_overlap_turn,
            max_overlap_forward,
        }
    }

    /// Extend the path until the spiral exhausts or the call is cancelled.
    /// Marks every tool-swept cell in `mask` as it goes.
    pub fn extend(
        &self,
        path: &mut PathLog,
        mask: &mut CellMask,
        yaw_start: f32,
        cancel: &CancelToken,
    ) {
        let mut yaw = if path.cells.len() >= 2 {
            step_yaw(path.cells[path.cells.len() - 2], path.last())
        } else {
            yaw_start
        };
        // The first direction tried from a fresh seed is the robot's +y axis
        let (mut dx, mut dy) = nearest_heading(yaw + FRAC_PI_2);

        // The seed's tool footprint counts as covered
        match self.engine.footprint_cells(path.last(), yaw, Part::Tool) {
            Ok(cells) => {
                for cell in cells {
                    mask.mark_visited(cell);
                }
            }
            Err(_) => {
                tracing::warn!(
                    "Seed tool footprint is out of bounds at ({}, {})",
                    path.last().x,
                    path.last().y
                );
            }
        }

        loop {
            if cancel.is_cancelled() {
                return;
            }
            if path.cells.len() >= 2 {
                let prev = path.cells[path.cells.len() - 2];
                let last = path.last();
                let step_x = last.x - prev.x;
                let step_y = last.y - prev.y;
                yaw = step_yaw(prev, last);
                // Turn counter-clockwise so the left manoeuvre is tried first
                dx = -step_y;
                dy = step_x;
            }

            let current = path.last();
            let mut advanced = false;
            for manoeuvre in [Manoeuvre::LeftTurn, Manoeuvre::Forward, Manoeuvre::RightTurn] {
                let next = current.offset(dx, dy);
                let yaw_next = (dy as f32).atan2(dx as f32);
                if let Some(swept) = self.admissible(manoeuvre, current, yaw, next, yaw_next, mask) {
                    path.append(next, mask);
                    for cell in swept {
                        mask.mark_visited(cell);
                    }
                    advanced = true;
                    break;
                }
                // Rotate the tentative heading clockwise for the next try
                (dx, dy) = (dy, -dx);
            }
            if !advanced {
                return;
            }
        }
    }

    /// Check one candidate step. Returns the tool cells it newly sweeps when
    /// the step is admissible.
    fn admissible(
        &self,
        manoeuvre: Manoeuvre,
        current: Cell,
        yaw: f32,
        next: Cell,
        yaw_next: f32,
        mask: &CellMask,
    ) -> Option<Vec<Cell>> {
        if !self.grid.in_bounds(next) || mask.is_blocked(next) {
            return None;
        }

        // Vehicle sweep from the precomputed catalog, rotated into the
        // current heading
        let vehicle = self.catalog.rotated(manoeuvre, current, yaw, self.grid);
        for cell in &vehicle {
            if !self.grid.in_bounds(*cell) || mask.is_blocked(*cell) {
                return None;
            }
        }

        // Tool sweep is computed live; its overlap with covered ground is
        // bounded per manoeuvre kind
        let tool = self
            .engine
            .manoeuvre_cells(current, yaw, next, yaw_next, RotationSense::Any, Part::Tool)
            .ok()?;
        let overlap = tool.iter().filter(|c| mask.is_visited(**c)).count();
        let budget = match manoeuvre {
            Manoeuvre::Forward => self.max_overlap_forward,
            _ => self.max_overlap_turn,
        };
        if overlap > budget {
            return None;
        }

        // Refuse steps after which neither rotational choice remains: the
        // manoeuvre model cannot back out of a single-cell cul-de-sac
        if self.future_unavailable(next, yaw_next, Manoeuvre::LeftTurn, mask)
            && self.future_unavailable(next, yaw_next, Manoeuvre::RightTurn, mask)
        {
            return None;
        }

        Some(tool)
    }

    /// A future rotational choice is unavailable when its sweep leaves the
    /// grid or finds no uncovered ground at all.
    fn future_unavailable(
        &self,
        at: Cell,
        yaw: f32,
        manoeuvre: Manoeuvre,
        mask: &CellMask,
    ) -> bool {
        let cells = self.catalog.rotated(manoeuvre, at, yaw, self.grid);
        if cells.is_empty() {
            return false;
        }
        if cells.iter().any(|c| !self.grid.in_bounds(*c)) {
            return true;
        }
        cells.iter().all(|c| !mask.is_free(*c))
    }
}

/// Yaw of the step between two adjacent cells.
#[inline]
fn step_yaw(from: Cell, to: Cell) -> f32 {
    ((to.y - from.y) as f32).atan2((to.x - from.x) as f32)
}

/// Grid direction nearest to an angle.
fn nearest_heading(angle: f32) -> (i32, i32) {
    let a = normalize_angle(angle);
    let (sin_a, cos_a) = a.sin_cos();
    if cos_a.abs() >= sin_a.abs() {
        (if cos_a >= 0.0 { 1 } else { -1 }, 0)
    } else {
        (0, if sin_a >= 0.0 { 1 } else { -1 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::WorldPoint;
    use std::f32::consts::PI;

    fn unit_polygon() -> Vec<WorldPoint> {
        vec![
            WorldPoint::new(-0.3, -0.2),
            WorldPoint::new(0.3, -0.2),
            WorldPoint::new(0.0, 0.3),
        ]
    }

    fn fixtures(width: usize, height: usize) -> (CoverageGrid, Vec<WorldPoint>) {
        let grid = CoverageGrid::new(width, height, 1.0, WorldPoint::ZERO).unwrap();
        (grid, unit_polygon())
    }

    #[test]
    fn test_nearest_heading() {
        assert_eq!(nearest_heading(FRAC_PI_2), (0, 1));
        assert_eq!(nearest_heading(PI), (-1, 0));
        assert_eq!(nearest_heading(-FRAC_PI_2), (0, -1));
        assert_eq!(nearest_heading(3.0 * FRAC_PI_2), (0, -1));
        assert_eq!(nearest_heading(0.2), (1, 0));
    }

    #[test]
    fn test_first_step_is_left_of_forward() {
        let (grid, poly) = fixtures(5, 5);
        let engine = FootprintEngine::new(&grid, poly.clone(), poly, 8);
        let catalog = ManoeuvreCatalog::build(&engine, &grid).unwrap();
        let spiral = Spiral::new(&grid, &engine, &catalog, 0, 0);

        let mut mask = CellMask::new(5, 5);
        let mut path = PathLog::new(Cell::new(2, 2));
        spiral.extend(&mut path, &mut mask, 0.0, &CancelToken::new());

        // Facing +x, the robot's +y is grid north
        assert!(path.cells.len() > 1);
        assert_eq!(path.cells[1], Cell::new(2, 3));
    }

    #[test]
    fn test_future_choice_veto_blocks_cul_de_sac() {
        let (grid, poly) = fixtures(3, 3);
        let engine = FootprintEngine::new(&grid, poly.clone(), poly, 8);
        let catalog = ManoeuvreCatalog::build(&engine, &grid).unwrap();
        let spiral = Spiral::new(&grid, &engine, &catalog, 0, 0);

        // From (1,0) facing north, stepping to (1,1) would leave both
        // rotational choices covered: the step must be refused, and so must
        // every other direction from (1,0).
        let mut mask = CellMask::new(3, 3);
        mask.mark_visited(Cell::new(0, 1));
        mask.mark_visited(Cell::new(2, 1));
        let mut path = PathLog::new(Cell::new(1, 0));
        spiral.extend(&mut path, &mut mask, FRAC_PI_2, &CancelToken::new());
        assert_eq!(path.cells.len(), 1);

        // With the right-hand side open again the step is taken
        let mut mask = CellMask::new(3, 3);
        mask.mark_visited(Cell::new(0, 1));
        let mut path = PathLog::new(Cell::new(1, 0));
        spiral.extend(&mut path, &mut mask, FRAC_PI_2, &CancelToken::new());
        assert!(path.cells.len() > 1);
        assert_eq!(path.cells[1], Cell::new(1, 1));
    }

    #[test]
    fn test_cancel_stops_extension() {
        let (grid, poly) = fixtures(8, 8);
        let engine = FootprintEngine::new(&grid, poly.clone(), poly, 8);
        let catalog = ManoeuvreCatalog::build(&engine, &grid).unwrap();
        let spiral = Spiral::new(&grid, &engine, &catalog, 0, 0);

        let cancel = CancelToken::new();
        cancel.cancel();
        let mut mask = CellMask::new(8, 8);
        let mut path = PathLog::new(Cell::new(0, 0));
        spiral.extend(&mut path, &mut mask, 0.0, &cancel);
        assert_eq!(path.cells.len(), 1);
    }
}
