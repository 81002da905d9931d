//! Convex polygon rasterisation onto the coverage grid.

use crate::core::{Cell, WorldPoint};
use crate::error::{CoverageError, Result};
use crate::grid::CoverageGrid;

/// Rasterise a convex polygon given in world coordinates.
///
/// Each vertex is quantised to its containing cell; the set of cells spanned
/// by those vertex cells is then convex-filled in index space, with edges
/// inclusive so that symmetric footprints yield symmetric rasters. The
/// result is deduplicated and sorted by row-major index.
///
/// Errors: [`CoverageError::DegenerateFootprint`] when the polygon has fewer
/// than three distinct points, [`CoverageError::OutOfBounds`] when any vertex
/// falls outside the grid. Vertex cells may still collapse onto one or two
/// distinct cells on a coarse grid; the fill then degrades to that cell or
/// the line between them.
pub fn rasterize(grid: &CoverageGrid, polygon: &[WorldPoint]) -> Result<Vec<Cell>> {
    let mut distinct: Vec<WorldPoint> = Vec::with_capacity(polygon.len());
    for p in polygon {
        if !distinct.iter().any(|q| q == p) {
            distinct.push(*p);
        }
    }
    if distinct.len() < 3 {
        return Err(CoverageError::DegenerateFootprint(format!(
            "polygon has {} distinct points, need at least 3",
            distinct.len()
        )));
    }

    let mut vertex_cells: Vec<Cell> = Vec::with_capacity(polygon.len());
    for p in polygon {
        let cell = grid.world_to_cell_unbounded(*p);
        if !grid.in_bounds(cell) {
            return Err(CoverageError::OutOfBounds);
        }
        vertex_cells.push(cell);
    }
    vertex_cells.sort_by_key(|c| grid.index(*c));
    vertex_cells.dedup();

    let hull = convex_hull(&vertex_cells);

    let mut min_x = vertex_cells[0].x;
    let mut max_x = vertex_cells[0].x;
    let mut min_y = vertex_cells[0].y;
    let mut max_y = vertex_cells[0].y;
    for cell in &vertex_cells {
        min_x = min_x.min(cell.x);
        max_x = max_x.max(cell.x);
        min_y = min_y.min(cell.y);
        max_y = max_y.max(cell.y);
    }

    let mut cells = Vec::new();
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let cell = Cell::new(x, y);
            if inside_hull(&hull, cell) {
                cells.push(cell);
            }
        }
    }
    Ok(cells)
}

/// Cross product of `(a - o) x (b - o)`.
#[inline]
fn cross(o: Cell, a: Cell, b: Cell) -> i64 {
    (a.x - o.x) as i64 * (b.y - o.y) as i64 - (a.y - o.y) as i64 * (b.x - o.x) as i64
}

/// Convex hull by Andrew's monotone chain, counter-clockwise. Collapses to
/// the two endpoints for collinear input and to the point itself for a
/// single cell.
fn convex_hull(points: &[Cell]) -> Vec<Cell> {
    let mut pts: Vec<Cell> = points.to_vec();
    pts.sort_by_key(|c| (c.x, c.y));
    pts.dedup();
    if pts.len() < 3 {
        return pts;
    }

    let mut lower: Vec<Cell> = Vec::new();
    for &p in &pts {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<Cell> = Vec::new();
    for &p in pts.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower
}

/// Point-in-hull test with inclusive edges.
fn inside_hull(hull: &[Cell], p: Cell) -> bool {
    match hull.len() {
        0 => false,
        1 => hull[0] == p,
        2 => cross(hull[0], hull[1], p) == 0,
        n => (0..n).all(|i| cross(hull[i], hull[(i + 1) % n], p) >= 0),
    }
}

/// Whether an ordered point sequence forms a convex polygon (either
/// winding). Consecutive duplicate points are tolerated; a sequence with no
/// actual turn is not convex.
pub(crate) fn polygon_is_convex(points: &[WorldPoint]) -> bool {
    let mut pts: Vec<WorldPoint> = Vec::with_capacity(points.len());
    for p in points {
        if pts.last() != Some(p) {
            pts.push(*p);
        }
    }
    if pts.len() > 1 && pts.first() == pts.last() {
        pts.pop();
    }
    if pts.len() < 3 {
        return false;
    }

    let n = pts.len();
    let mut sign = 0.0f32;
    for i in 0..n {
        let a = pts[i];
        let b = pts[(i + 1) % n];
        let c = pts[(i + 2) % n];
        let turn = (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x);
        if turn.abs() <= 1e-9 {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    sign != 0.0
}
