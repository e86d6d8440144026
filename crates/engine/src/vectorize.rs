//! Path vectorization and planar measurement
//!
//! Converts a traced cost path into a polyline through the cell centers,
//! simplifies it with Douglas-Peucker, and measures its planar length in
//! CRS units. A trace shorter than two cells cannot form a line — that is
//! the "degenerate geometry" class the driver maps to a zero distance
//! rather than a failure.

use geo::{EuclideanLength, Simplify};
use geo_types::{Coord, LineString};
use lcpath_core::{Error, GeoTransform, Result};

use crate::path::CostPath;

/// Parameters for path vectorization
#[derive(Debug, Clone)]
pub struct VectorizeParams {
    /// Douglas-Peucker tolerance in CRS units (0 keeps every vertex)
    pub simplify_tolerance: f64,
}

impl Default for VectorizeParams {
    fn default() -> Self {
        Self {
            simplify_tolerance: 1.0,
        }
    }
}

/// A vectorized least-cost path and its planar length
#[derive(Debug, Clone)]
pub struct PathPolyline {
    /// Simplified line through the path's cell centers
    pub line: LineString<f64>,
    /// Total planar length in CRS units
    pub length: f64,
}

/// Vectorize a traced cost path into a simplified polyline.
///
/// # Errors
/// [`Error::DegenerateGeometry`] when the trace has fewer than two cells
/// (source and destination share a cell or are immediately adjacent in a
/// way that collapses the line).
pub fn vectorize_path(
    path: &CostPath,
    transform: &GeoTransform,
    params: &VectorizeParams,
) -> Result<PathPolyline> {
    if path.cells.len() < 2 {
        return Err(Error::DegenerateGeometry(format!(
            "path trace has {} cell(s), need at least 2 for a line",
            path.cells.len()
        )));
    }

    let coords: Vec<Coord<f64>> = path
        .cells
        .iter()
        .map(|&(row, col)| {
            let (x, y) = transform.pixel_to_geo(col, row);
            Coord { x, y }
        })
        .collect();

    let mut line = LineString::new(coords);
    if params.simplify_tolerance > 0.0 {
        line = line.simplify(&params.simplify_tolerance);
    }

    let length = line.euclidean_length();
    Ok(PathPolyline { line, length })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn trace(cells: Vec<(usize, usize)>) -> CostPath {
        CostPath {
            cells,
            path_cost: 0.0,
        }
    }

    #[test]
    fn test_straight_path_simplifies_to_endpoints() {
        let gt = GeoTransform::new(0.0, 100.0, 10.0, -10.0);
        let path = trace(vec![(5, 0), (5, 1), (5, 2), (5, 3), (5, 4)]);

        let poly = vectorize_path(&path, &gt, &VectorizeParams::default()).unwrap();
        assert_eq!(poly.line.0.len(), 2);
        assert_relative_eq!(poly.length, 40.0, epsilon = 1e-10);
    }

    #[test]
    fn test_l_shaped_path_keeps_corner() {
        let gt = GeoTransform::new(0.0, 100.0, 10.0, -10.0);
        let path = trace(vec![(0, 0), (0, 1), (0, 2), (1, 2), (2, 2)]);

        let poly = vectorize_path(&path, &gt, &VectorizeParams::default()).unwrap();
        assert_eq!(poly.line.0.len(), 3);
        assert_relative_eq!(poly.length, 40.0, epsilon = 1e-10);
    }

    #[test]
    fn test_zero_tolerance_keeps_all_vertices() {
        let gt = GeoTransform::default();
        let path = trace(vec![(0, 0), (0, 1), (0, 2)]);

        let params = VectorizeParams {
            simplify_tolerance: 0.0,
        };
        let poly = vectorize_path(&path, &gt, &params).unwrap();
        assert_eq!(poly.line.0.len(), 3);
    }

    #[test]
    fn test_single_cell_is_degenerate() {
        let gt = GeoTransform::default();
        let path = trace(vec![(3, 3)]);

        let err = vectorize_path(&path, &gt, &VectorizeParams::default());
        assert!(matches!(err, Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn test_empty_trace_is_degenerate() {
        let gt = GeoTransform::default();
        let err = vectorize_path(&trace(vec![]), &gt, &VectorizeParams::default());
        assert!(matches!(err, Err(Error::DegenerateGeometry(_))));
    }
}
