//! Precomputed canonical manoeuvres, reused by rotation at runtime.

use crate::core::{Cell, WorldPoint};
use crate::error::Result;
use crate::grid::CoverageGrid;
use std::f32::consts::{FRAC_PI_2, PI};

use super::engine::{FootprintEngine, Part, RotationSense};

/// The canonical manoeuvres the spiral is built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Manoeuvre {
    /// Rotate +π/2 in place, then step one cell along the new heading.
    LeftTurn,
    /// Step one cell straight ahead.
    Forward,
    /// Rotate -π/2 in place, then step one cell along the new heading.
    RightTurn,
    /// Rotate π in place, counter-clockwise.
    TurnAroundLeft,
    /// Rotate π in place, clockwise.
    TurnAroundRight,
}

/// Vehicle swept-cell offsets for each canonical manoeuvre, computed once at
/// a reference pose and rotated into the current heading at runtime.
///
/// The rotation goes through world coordinates (`rotate_point`) rather than
/// integer index arithmetic: the cell-to-world mapping carries a half-cell
/// offset, and quantising after the world-space rotation is what keeps the
/// offsets aligned with the footprint rasters at every heading.
#[derive(Clone, Debug)]
pub struct ManoeuvreCatalog {
    left_turn: Vec<Cell>,
    forward: Vec<Cell>,
    right_turn: Vec<Cell>,
    turn_around_left: Vec<Cell>,
    turn_around_right: Vec<Cell>,
}

impl ManoeuvreCatalog {
    /// Compute the catalog at the grid midpoint with reference yaw 0.
    ///
    /// Fails with [`crate::CoverageError::OutOfBounds`] when the vehicle's
    /// canonical manoeuvres do not fit the grid even at its midpoint.
    pub fn build(engine: &FootprintEngine<'_>, grid: &CoverageGrid) -> Result<Self> {
        let mid = Cell::new(grid.width() as i32 / 2, grid.height() as i32 / 2);

        let left_turn = engine.manoeuvre_cells(
            mid,
            0.0,
            mid.offset(0, 1),
            FRAC_PI_2,
            RotationSense::Any,
            Part::Vehicle,
        )?;
        let forward = engine.manoeuvre_cells(
            mid,
            0.0,
            mid.offset(1, 0),
            0.0,
            RotationSense::Any,
            Part::Vehicle,
        )?;
        let right_turn = engine.manoeuvre_cells(
            mid,
            0.0,
            mid.offset(0, -1),
            -FRAC_PI_2,
            RotationSense::Any,
            Part::Vehicle,
        )?;
        let turn_around_left = engine.manoeuvre_cells(
            mid,
            0.0,
            mid,
            PI,
            RotationSense::CounterClockwise,
            Part::Vehicle,
        )?;
        let turn_around_right =
            engine.manoeuvre_cells(mid, 0.0, mid, PI, RotationSense::Clockwise, Part::Vehicle)?;

        let relative = |cells: Vec<Cell>| -> Vec<Cell> { cells.iter().map(|c| *c - mid).collect() };

        Ok(Self {
            left_turn: relative(left_turn),
            forward: relative(forward),
            right_turn: relative(right_turn),
            turn_around_left: relative(turn_around_left),
            turn_around_right: relative(turn_around_right),
        })
    }

    /// Relative cell offsets of a canonical manoeuvre at reference yaw 0.
    pub fn offsets(&self, manoeuvre: Manoeuvre) -> &[Cell] {
        match manoeuvre {
            Manoeuvre::LeftTurn => &self.left_turn,
            Manoeuvre::Forward => &self.forward,
            Manoeuvre::RightTurn => &self.right_turn,
            Manoeuvre::TurnAroundLeft => &self.turn_around_left,
            Manoeuvre::TurnAroundRight => &self.turn_around_right,
        }
    }

    /// Absolute swept cells of a manoeuvre executed at `at` with the given
    /// heading. Results may fall outside the grid; callers bounds-check.
    pub fn rotated(
        &self,
        manoeuvre: Manoeuvre,
        at: Cell,
        yaw: f32,
        grid: &CoverageGrid,
    ) -> Vec<Cell> {
        self.offsets(manoeuvre)
            .iter()
            .map(|offset| rotate_point(grid, at + *offset, at, yaw))
            .collect()
    }
}

/// Rotate a cell about another cell's centre by `yaw`, in world coordinates,
/// and quantise back to a cell. Integer rotation of the offsets would drift
/// on diagonal headings; going through world space keeps the rotated offsets
/// consistent with the polygon rasters.
pub fn rotate_point(grid: &CoverageGrid, poi: Cell, about: Cell, yaw: f32) -> Cell {
    let p = grid.cell_to_world(poi);
    let c = grid.cell_to_world(about);
    let (sin_y, cos_y) = yaw.sin_cos();
    let rotated = WorldPoint::new(
        c.x + (p.x - c.x) * cos_y - (p.y - c.y) * sin_y,
        c.y + (p.x - c.x) * sin_y + (p.y - c.y) * cos_y,
    );
    grid.world_to_cell_unbounded(rotated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> CoverageGrid {
        CoverageGrid::new(9, 9, 1.0, WorldPoint::ZERO).unwrap()
    }

    fn unit_polygon() -> Vec<WorldPoint> {
        vec![
            WorldPoint::new(-0.3, -0.2),
            WorldPoint::new(0.3, -0.2),
            WorldPoint::new(0.0, 0.3),
        ]
    }

    fn catalog(grid: &CoverageGrid) -> ManoeuvreCatalog {
        let engine = FootprintEngine::new(grid, unit_polygon(), unit_polygon(), 8);
        ManoeuvreCatalog::build(&engine, grid).unwrap()
    }

    #[test]
    fn test_unit_footprint_offsets() {
        let g = grid();
        let c = catalog(&g);
        assert_eq!(c.offsets(Manoeuvre::LeftTurn), &[Cell::new(0, 1)]);
        assert_eq!(c.offsets(Manoeuvre::Forward), &[Cell::new(1, 0)]);
        assert_eq!(c.offsets(Manoeuvre::RightTurn), &[Cell::new(0, -1)]);
        // In-place rotation of a sub-cell footprint sweeps nothing new
        assert!(c.offsets(Manoeuvre::TurnAroundLeft).is_empty());
        assert!(c.offsets(Manoeuvre::TurnAroundRight).is_empty());
    }

    #[test]
    fn test_rotated_follows_heading() {
        let g = grid();
        let c = catalog(&g);
        let at = Cell::new(4, 4);
        // Facing +y, a left turn steps towards -x
        assert_eq!(
            c.rotated(Manoeuvre::LeftTurn, at, std::f32::consts::FRAC_PI_2, &g),
            vec![Cell::new(3, 4)]
        );
        // Facing -x, forward steps towards -x
        assert_eq!(c.rotated(Manoeuvre::Forward, at, std::f32::consts::PI, &g), vec![
            Cell::new(3, 4)
        ]);
    }

    #[test]
    fn test_rotate_point_quantises_to_cell_centres() {
        let g = grid();
        let about = Cell::new(4, 4);
        for (yaw, expected) in [
            (0.0, Cell::new(6, 5)),
            (std::f32::consts::FRAC_PI_2, Cell::new(3, 6)),
            (std::f32::consts::PI, Cell::new(2, 3)),
            (-std::f32::consts::FRAC_PI_2, Cell::new(5, 2)),
        ] {
            assert_eq!(rotate_point(&g, Cell::new(6, 5), about, yaw), expected);
        }
    }
}
