//! # lcpath core
//!
//! Core types and I/O for pairwise least-cost-path analysis.
//!
//! This crate provides:
//! - `Raster<T>`: georeferenced raster grid
//! - `GeoTransform`: affine transformation for georeferencing
//! - `Location`/`LocationSet`: named analysis points loaded from CSV
//! - GeoTIFF and GeoJSON I/O

pub mod error;
pub mod io;
pub mod locations;
pub mod raster;

pub use error::{Error, Result};
pub use locations::{Location, LocationFields, LocationSet};
pub use raster::{GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::locations::{Location, LocationFields, LocationSet};
    pub use crate::raster::{GeoTransform, Raster, RasterElement};
}
