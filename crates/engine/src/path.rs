//! Least-cost path extraction by backlink tracing
//!
//! Starting at the destination cell, follows the backlink surface one D8
//! step at a time until it reaches the cost surface's source. The returned
//! trace is destination-first, and the accumulated cost at the destination
//! cell is the path's total cost.

use lcpath_core::raster::Raster;
use lcpath_core::{Error, Result};

use crate::surface::{CostSurface, D8_OFFSETS};

/// Cell value for ordinary path cells in the rasterized cost path
pub const PATH_CELL: u8 = 1;
/// Cell value for the trace start (the destination) in the rasterized path
pub const PATH_START_CELL: u8 = 3;

/// One extracted least-cost path
#[derive(Debug, Clone)]
pub struct CostPath {
    /// Path cells, destination first, source last
    pub cells: Vec<(usize, usize)>,
    /// Accumulated traversal cost from the source to the destination
    pub path_cost: f64,
}

impl CostPath {
    /// Rasterize the path for persistence: [`PATH_CELL`] on path cells,
    /// [`PATH_START_CELL`] at the trace start, 0 elsewhere.
    pub fn to_raster(&self, like: &Raster<f64>) -> Raster<u8> {
        let mut out = like.with_same_meta::<u8>();
        for &(row, col) in &self.cells {
            let _ = out.set(row, col, PATH_CELL);
        }
        if let Some(&(row, col)) = self.cells.first() {
            let _ = out.set(row, col, PATH_START_CELL);
        }
        out
    }
}

/// Trace the least-cost path from a destination cell back to the surface's
/// source.
///
/// # Errors
/// - [`Error::IndexOutOfBounds`] when the destination lies outside the grid
/// - [`Error::Unreachable`] when the destination was never reached by the
///   cost surface (NaN accumulated cost)
/// - [`Error::Algorithm`] when the backlink surface is inconsistent (trace
///   leaves the grid or cycles)
pub fn cost_path(surface: &CostSurface, dest: (usize, usize), dest_name: &str) -> Result<CostPath> {
    let (rows, cols) = surface.cost.shape();
    let (dest_row, dest_col) = dest;

    if dest_row >= rows || dest_col >= cols {
        return Err(Error::IndexOutOfBounds {
            row: dest_row,
            col: dest_col,
            rows,
            cols,
        });
    }

    let path_cost = unsafe { surface.cost.get_unchecked(dest_row, dest_col) };
    if path_cost.is_nan() {
        return Err(Error::Unreachable {
            name: dest_name.to_string(),
        });
    }

    let mut cells = Vec::new();
    let (mut row, mut col) = (dest_row, dest_col);
    // A valid trace visits each cell at most once
    let max_steps = rows * cols;

    loop {
        cells.push((row, col));

        let dir = unsafe { surface.backlink.get_unchecked(row, col) };
        if dir == 0 {
            if (row, col) != surface.source_cell {
                return Err(Error::Algorithm(format!(
                    "backlink trace ended at ({}, {}) instead of the source",
                    row, col
                )));
            }
            break;
        }

        let (dr, dc) = D8_OFFSETS[(dir - 1) as usize];
        let nr = row as isize + dr;
        let nc = col as isize + dc;
        if nr < 0 || nc < 0 || nr as usize >= rows || nc as usize >= cols {
            return Err(Error::Algorithm(format!(
                "backlink trace left the grid at ({}, {})",
                row, col
            )));
        }
        row = nr as usize;
        col = nc as usize;

        if cells.len() >= max_steps {
            return Err(Error::Algorithm(
                "backlink trace does not terminate (cycle)".to_string(),
            ));
        }
    }

    Ok(CostPath { cells, path_cost })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_model::VerticalFactor;
    use crate::surface::path_distance;
    use approx::assert_relative_eq;
    use lcpath_core::{GeoTransform, Raster};

    fn flat_surface(rows: usize, cols: usize, source: (usize, usize)) -> CostSurface {
        let mut dem = Raster::filled(rows, cols, 50.0);
        dem.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
        let vf = VerticalFactor::from_breaks(vec![(-90.0, 1.0), (90.0, 1.0)]).unwrap();
        path_distance(&dem, &vf, source).unwrap()
    }

    #[test]
    fn test_straight_trace() {
        let surface = flat_surface(5, 5, (2, 0));
        let path = cost_path(&surface, (2, 4), "east").unwrap();

        assert_eq!(path.cells.len(), 5);
        assert_eq!(path.cells.first(), Some(&(2, 4)));
        assert_eq!(path.cells.last(), Some(&(2, 0)));
        assert_relative_eq!(path.path_cost, 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_diagonal_trace() {
        let surface = flat_surface(5, 5, (0, 0));
        let path = cost_path(&surface, (4, 4), "corner").unwrap();

        assert_eq!(path.cells.len(), 5);
        assert_relative_eq!(
            path.path_cost,
            4.0 * std::f64::consts::SQRT_2,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_dest_equals_source() {
        let surface = flat_surface(3, 3, (1, 1));
        let path = cost_path(&surface, (1, 1), "self").unwrap();

        assert_eq!(path.cells, vec![(1, 1)]);
        assert_relative_eq!(path.path_cost, 0.0);
    }

    #[test]
    fn test_unreachable_dest() {
        let mut dem = Raster::filled(5, 5, 50.0);
        dem.set_transform(GeoTransform::new(0.0, 5.0, 1.0, -1.0));
        for row in 0..5 {
            dem.set(row, 2, f64::NAN).unwrap();
        }
        let vf = VerticalFactor::from_breaks(vec![(-90.0, 1.0), (90.0, 1.0)]).unwrap();
        let surface = path_distance(&dem, &vf, (2, 0)).unwrap();

        let err = cost_path(&surface, (2, 4), "far side");
        assert!(matches!(err, Err(Error::Unreachable { .. })));
    }

    #[test]
    fn test_dest_out_of_bounds() {
        let surface = flat_surface(3, 3, (0, 0));
        let err = cost_path(&surface, (5, 5), "outside");
        assert!(matches!(err, Err(Error::IndexOutOfBounds { .. })));
    }

    #[test]
    fn test_to_raster_marks_path() {
        let surface = flat_surface(5, 5, (2, 0));
        let path = cost_path(&surface, (2, 4), "east").unwrap();

        let dem = Raster::filled(5, 5, 50.0);
        let raster = path.to_raster(&dem);
        assert_eq!(raster.get(2, 4).unwrap(), PATH_START_CELL);
        assert_eq!(raster.get(2, 2).unwrap(), PATH_CELL);
        assert_eq!(raster.get(2, 0).unwrap(), PATH_CELL);
        assert_eq!(raster.get(0, 0).unwrap(), 0);
    }
}
