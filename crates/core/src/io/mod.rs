//! I/O for rasters and path geometries

mod geojson;
mod geotiff;

pub use geojson::write_polyline;
pub use geotiff::{read_geotiff, write_geotiff, write_geotiff_u8};
