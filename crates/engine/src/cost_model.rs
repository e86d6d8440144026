//! Slope→cost vertical-factor tables
//!
//! A vertical factor table maps the slope of a move (in degrees, negative
//! for downhill) to a traversal cost multiplier. Tables are plain text,
//! two columns per line (slope, factor), whitespace or comma separated,
//! `#` comments and blank lines ignored:
//!
//! ```text
//! # Tobler hiking function, cost = 1/speed
//! -70   7.1
//! -10   0.6
//!  0    0.8
//!  10   1.6
//!  70   9.5
//! ```
//!
//! Evaluation interpolates linearly between breakpoints. Slopes outside
//! the tabulated range, and breakpoints with negative factors, mark the
//! move impassable.

use lcpath_core::{Error, Result};
use std::path::Path;

/// An immutable slope→cost lookup, loaded once per run
#[derive(Debug, Clone)]
pub struct VerticalFactor {
    /// (slope_degrees, factor) breakpoints, strictly ascending by slope
    breaks: Vec<(f64, f64)>,
}

impl VerticalFactor {
    /// Load a table from a text file. Malformed tables are fatal: no
    /// pairwise analysis can proceed without a cost model.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&text)
    }

    /// Parse a table from text
    pub fn parse(text: &str) -> Result<Self> {
        let mut breaks = Vec::new();

        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut parts = line.split(|c: char| c.is_whitespace() || c == ',');
            let mut next_number = |what: &str| -> Result<f64> {
                parts
                    .by_ref()
                    .find(|p| !p.is_empty())
                    .ok_or_else(|| {
                        Error::CostTable(format!("line {}: missing {}", lineno + 1, what))
                    })?
                    .parse::<f64>()
                    .map_err(|_| {
                        Error::CostTable(format!("line {}: {} is not a number", lineno + 1, what))
                    })
            };

            let slope = next_number("slope")?;
            let factor = next_number("factor")?;
            if !slope.is_finite() || !factor.is_finite() {
                return Err(Error::CostTable(format!(
                    "line {}: non-finite value",
                    lineno + 1
                )));
            }
            breaks.push((slope, factor));
        }

        Self::from_breaks(breaks)
    }

    /// Build a table from breakpoints, validating ordering
    pub fn from_breaks(breaks: Vec<(f64, f64)>) -> Result<Self> {
        if breaks.len() < 2 {
            return Err(Error::CostTable(
                "need at least two (slope, factor) rows".to_string(),
            ));
        }
        for pair in breaks.windows(2) {
            if pair[1].0 <= pair[0].0 {
                return Err(Error::CostTable(format!(
                    "slopes must be strictly ascending ({} after {})",
                    pair[1].0, pair[0].0
                )));
            }
        }
        Ok(Self { breaks })
    }

    /// Cost multiplier for a move of the given slope, in degrees.
    ///
    /// Returns `None` when the move is impassable: slope outside the
    /// tabulated range, or a negative factor at either bracketing break.
    pub fn factor(&self, slope_deg: f64) -> Option<f64> {
        let first = self.breaks[0];
        let last = self.breaks[self.breaks.len() - 1];
        if !slope_deg.is_finite() || slope_deg < first.0 || slope_deg > last.0 {
            return None;
        }

        let upper = self
            .breaks
            .iter()
            .position(|&(s, _)| s >= slope_deg)
            .expect("slope within table range");
        if self.breaks[upper].0 == slope_deg {
            let f = self.breaks[upper].1;
            return (f >= 0.0).then_some(f);
        }

        let (s0, f0) = self.breaks[upper - 1];
        let (s1, f1) = self.breaks[upper];
        if f0 < 0.0 || f1 < 0.0 {
            return None;
        }
        let t = (slope_deg - s0) / (s1 - s0);
        Some(f0 + t * (f1 - f0))
    }

    /// Tabulated slope range as (min, max) degrees
    pub fn slope_range(&self) -> (f64, f64) {
        (self.breaks[0].0, self.breaks[self.breaks.len() - 1].0)
    }
}
