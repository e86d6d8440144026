//! Location sets: the named analysis points of a pairwise run
//!
//! Each location carries a short filesystem-safe identifier used to name
//! output rasters and polylines, and a display name used in result rows
//! and log messages. Sets are loaded from CSV point tables; the column
//! names are configurable because survey data rarely agrees on them.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

/// Maximum length of the short file identifier.
///
/// Combined pair names (`cp_<a>_<b>`) must stay short enough for legacy
/// GRID-style 13-character raster names.
pub const MAX_ID_LEN: usize = 4;

/// A named analysis point
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    /// Short filesystem-safe identifier (≤ [`MAX_ID_LEN`] chars), used in
    /// output file names
    pub id: String,
    /// Display name, used in result rows and logs
    pub name: String,
    /// X coordinate in the DEM's CRS
    pub x: f64,
    /// Y coordinate in the DEM's CRS
    pub y: f64,
}

/// Which CSV columns hold the location fields
#[derive(Debug, Clone)]
pub struct LocationFields {
    pub id: String,
    pub name: String,
    pub x: String,
    pub y: String,
}

impl Default for LocationFields {
    fn default() -> Self {
        Self {
            id: "id".to_string(),
            name: "name".to_string(),
            x: "x".to_string(),
            y: "y".to_string(),
        }
    }
}

/// An ordered collection of locations, identifiers unique within the set
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocationSet {
    locations: Vec<Location>,
}

impl LocationSet {
    /// Build a set from pre-constructed locations, validating identifiers
    pub fn new(locations: Vec<Location>) -> Result<Self> {
        let mut seen = HashSet::new();
        for loc in &locations {
            validate_id(&loc.id)?;
            if !seen.insert(loc.id.clone()) {
                return Err(Error::Location(format!(
                    "duplicate location identifier '{}'",
                    loc.id
                )));
            }
        }
        Ok(Self { locations })
    }

    /// Load a set from a CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P, fields: &LocationFields) -> Result<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        Self::from_reader(file, fields)
    }

    /// Load a set from any CSV reader
    pub fn from_reader<R: Read>(reader: R, fields: &LocationFields) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);

        let headers = rdr.headers()?.clone();
        let col = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::Location(format!("missing column '{}'", name)))
        };
        let (id_col, name_col) = (col(&fields.id)?, col(&fields.name)?);
        let (x_col, y_col) = (col(&fields.x)?, col(&fields.y)?);

        let mut locations = Vec::new();
        for record in rdr.records() {
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or("").trim();

            let parse_coord = |idx: usize, axis: &str| -> Result<f64> {
                field(idx).parse::<f64>().map_err(|_| {
                    Error::Location(format!(
                        "bad {} coordinate '{}' for location '{}'",
                        axis,
                        field(idx),
                        field(name_col)
                    ))
                })
            };

            locations.push(Location {
                id: field(id_col).to_string(),
                name: field(name_col).to_string(),
                x: parse_coord(x_col, "x")?,
                y: parse_coord(y_col, "y")?,
            });
        }

        Self::new(locations)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl IntoIterator for LocationSet {
    type Item = Location;
    type IntoIter = std::vec::IntoIter<Location>;

    fn into_iter(self) -> Self::IntoIter {
        self.locations.into_iter()
    }
}

fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::Location("empty location identifier".to_string()));
    }
    if id.len() > MAX_ID_LEN {
        return Err(Error::Location(format!(
            "location identifier '{}' exceeds {} characters",
            id, MAX_ID_LEN
        )));
    }
    if !id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(Error::Location(format!(
            "location identifier '{}' contains non filesystem-safe characters",
            id
        )));
    }
    Ok(())
}
