//! Accumulated-cost and backlink surface generation
//!
//! Computes, for one source cell, the minimum accumulated traversal cost to
//! every reachable DEM cell, using Dijkstra's algorithm on an 8-connected
//! grid. Traversal cost is anisotropic: each move is charged its planar
//! step distance times the vertical factor of the move's slope, so the
//! same edge costs differently uphill than downhill.
//!
//! A companion backlink raster records, per cell, the D8 direction toward
//! the optimal predecessor (0 = source or unreached), which the path
//! extractor follows back to the source.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use lcpath_core::raster::Raster;
use lcpath_core::{Error, Result};
use ndarray::Array2;

use crate::cost_model::VerticalFactor;

/// One source location's cost surface and its companion backlink surface.
///
/// Created once per source, then reused read-only for every destination
/// paired with that source.
#[derive(Debug, Clone)]
pub struct CostSurface {
    /// Accumulated traversal cost per cell; NaN where unreachable
    pub cost: Raster<f64>,
    /// D8 direction toward the optimal predecessor; 0 at the source and
    /// on unreached cells
    pub backlink: Raster<u8>,
    /// The source cell this surface was grown from
    pub source_cell: (usize, usize),
}

/// State in the priority queue (min-heap via reversed ordering)
#[derive(Debug, Clone, PartialEq)]
struct State {
    cost: f64,
    row: usize,
    col: usize,
}

impl Eq for State {}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other.cost.partial_cmp(&self.cost).unwrap_or(Ordering::Equal)
    }
}

/// D8 neighbor offsets matching the direction encoding (1=E, 2=NE, ..., 8=SE)
pub const D8_OFFSETS: [(isize, isize); 8] = [
    (0, 1),   // 1: E
    (-1, 1),  // 2: NE
    (-1, 0),  // 3: N
    (-1, -1), // 4: NW
    (0, -1),  // 5: W
    (1, -1),  // 6: SW
    (1, 0),   // 7: S
    (1, 1),   // 8: SE
];

/// Step distance multiplier per D8 direction (1.0 cardinal, sqrt(2) diagonal)
const D8_STEPS: [f64; 8] = [
    1.0,
    std::f64::consts::SQRT_2,
    1.0,
    std::f64::consts::SQRT_2,
    1.0,
    std::f64::consts::SQRT_2,
    1.0,
    std::f64::consts::SQRT_2,
];

/// Opposite D8 direction (the backlink a neighbor stores after a move)
fn opposite_dir(dir: u8) -> u8 {
    ((dir - 1 + 4) % 8) + 1
}

/// Compute the accumulated-cost surface and backlink surface for one source.
///
/// Cost to move between adjacent cells a→b:
/// ```text
/// planar = cell_size * step          (step = 1 or sqrt(2))
/// slope  = atan((z_b - z_a) / planar) in degrees
/// cost   = planar * vf(slope)
/// ```
/// Moves whose slope falls outside the vertical-factor table are not
/// taken; NaN DEM cells are barriers.
///
/// # Errors
/// Fails when the source cell is outside the DEM or has no elevation —
/// the caller skips every destination paired with that source.
pub fn path_distance(
    dem: &Raster<f64>,
    vf: &VerticalFactor,
    source: (usize, usize),
) -> Result<CostSurface> {
    let (rows, cols) = dem.shape();
    let (src_row, src_col) = source;

    if src_row >= rows || src_col >= cols {
        return Err(Error::IndexOutOfBounds {
            row: src_row,
            col: src_col,
            rows,
            cols,
        });
    }
    let src_z = unsafe { dem.get_unchecked(src_row, src_col) };
    if dem.is_nodata(src_z) {
        return Err(Error::Algorithm(
            "source cell has no elevation data".to_string(),
        ));
    }

    let cell_size = dem.cell_size();
    let mut dist = vec![f64::INFINITY; rows * cols];
    let mut links = vec![0u8; rows * cols];
    let mut heap = BinaryHeap::new();

    dist[src_row * cols + src_col] = 0.0;
    heap.push(State {
        cost: 0.0,
        row: src_row,
        col: src_col,
    });

    while let Some(State { cost, row, col }) = heap.pop() {
        // Skip if a better path was already found
        if cost > dist[row * cols + col] {
            continue;
        }

        let z_here = unsafe { dem.get_unchecked(row, col) };

        for dir in 1u8..=8 {
            let (dr, dc) = D8_OFFSETS[(dir - 1) as usize];
            let nr = row as isize + dr;
            let nc = col as isize + dc;

            if nr < 0 || nc < 0 || nr as usize >= rows || nc as usize >= cols {
                continue;
            }
            let (nr, nc) = (nr as usize, nc as usize);

            let z_next = unsafe { dem.get_unchecked(nr, nc) };
            if dem.is_nodata(z_next) {
                continue; // Barrier
            }

            let planar = cell_size * D8_STEPS[(dir - 1) as usize];
            let slope_deg = ((z_next - z_here) / planar).atan().to_degrees();
            let factor = match vf.factor(slope_deg) {
                Some(f) => f,
                None => continue, // Impassable at this slope
            };

            let new_cost = cost + planar * factor;
            if new_cost < dist[nr * cols + nc] {
                dist[nr * cols + nc] = new_cost;
                links[nr * cols + nc] = opposite_dir(dir);
                heap.push(State {
                    cost: new_cost,
                    row: nr,
                    col: nc,
                });
            }
        }
    }

    // Unreached cells become NaN
    for d in &mut dist {
        if d.is_infinite() {
            *d = f64::NAN;
        }
    }

    let mut cost = dem.with_same_meta::<f64>();
    cost.set_nodata(Some(f64::NAN));
    *cost.data_mut() =
        Array2::from_shape_vec((rows, cols), dist).map_err(|e| Error::Other(e.to_string()))?;

    let mut backlink = dem.with_same_meta::<u8>();
    *backlink.data_mut() =
        Array2::from_shape_vec((rows, cols), links).map_err(|e| Error::Other(e.to_string()))?;

    Ok(CostSurface {
        cost,
        backlink,
        source_cell: source,
    })
}
