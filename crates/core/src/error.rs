//! Error types for lcpath
//!
//! Each failure class the pair iteration driver has to distinguish gets its
//! own variant, so skip-vs-abort decisions match on types rather than on
//! message substrings.

use thiserror::Error;

/// Main error type for lcpath operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("GeoTIFF error: {0}")]
    GeoTiff(String),

    #[error("Malformed cost table: {0}")]
    CostTable(String),

    #[error("Invalid location data: {0}")]
    Location(String),

    #[error("Point '{name}' ({x}, {y}) falls outside the raster extent")]
    OutsideExtent { name: String, x: f64, y: f64 },

    #[error("Destination '{name}' is unreachable on the cost surface")]
    Unreachable { name: String },

    #[error("Degenerate path geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for lcpath operations
pub type Result<T> = std::result::Result<T, Error>;
