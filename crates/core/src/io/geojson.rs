//! GeoJSON output for vectorized least-cost paths

use crate::error::Result;
use geo_types::LineString;
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a path polyline as a single-feature GeoJSON file.
///
/// The feature carries the source and destination display names and the
/// planar length as properties, so the file is self-describing when loaded
/// into a GIS on its own.
pub fn write_polyline<P: AsRef<Path>>(
    path: P,
    line: &LineString<f64>,
    source: &str,
    dest: &str,
    length: f64,
) -> Result<()> {
    let coords: Vec<[f64; 2]> = line.coords().map(|c| [c.x, c.y]).collect();

    let feature = json!({
        "type": "Feature",
        "geometry": {
            "type": "LineString",
            "coordinates": coords,
        },
        "properties": {
            "source": source,
            "dest": dest,
            "length": length,
        },
    });

    let file = File::create(path.as_ref())?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &feature)
        .map_err(|e| crate::error::Error::Other(format!("GeoJSON encode error: {}", e)))?;
    out.flush()?;
    Ok(())
}
