//! Result rows, the master table, and CSV export
//!
//! The master table is in-memory and append-only for the run, exported
//! once at the end as `master.csv` with columns
//! `Source,Dest,PathCost,Distance`. A distance that could not be
//! calculated exports as the sentinel `NA`, distinct from a genuine zero.

use lcpath_core::Result;
use std::path::Path;

/// Sentinel exported when a pair's distance could not be calculated
pub const DISTANCE_NA: &str = "NA";

/// Column headers of the master and per-pair tables
pub const RESULT_FIELDS: [&str; 4] = ["Source", "Dest", "PathCost", "Distance"];

/// One ordered pair's result
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    /// Source display name
    pub source: String,
    /// Destination display name
    pub dest: String,
    /// Accumulated traversal cost of the least-cost path
    pub path_cost: f64,
    /// Planar path length in CRS units; `None` when vectorization failed
    /// for a reason other than degenerate geometry
    pub distance: Option<f64>,
}

impl ResultRow {
    fn record(&self) -> [String; 4] {
        [
            self.source.clone(),
            self.dest.clone(),
            self.path_cost.to_string(),
            match self.distance {
                Some(d) => d.to_string(),
                None => DISTANCE_NA.to_string(),
            },
        ]
    }
}

/// The run's master result table, append-only
#[derive(Debug, Default)]
pub struct ResultTable {
    rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the table to `path`, header first. Called once with no rows
    /// at run start (so a table that cannot be created aborts the run
    /// before any surface work) and once with all rows at run end.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;
        writer.write_record(RESULT_FIELDS)?;
        for row in &self.rows {
            writer.write_record(row.record())?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Persist a single pair's row as its own table (intermediate data)
pub fn write_pair_table(path: &Path, row: &ResultRow) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(RESULT_FIELDS)?;
    writer.write_record(row.record())?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Vec<ResultRow> {
        vec![
            ResultRow {
                source: "Abiquiu".to_string(),
                dest: "Chama".to_string(),
                path_cost: 1234.5,
                distance: Some(987.25),
            },
            ResultRow {
                source: "Abiquiu".to_string(),
                dest: "Ojo".to_string(),
                path_cost: 55.0,
                distance: None,
            },
            ResultRow {
                source: "Chama".to_string(),
                dest: "Ojo".to_string(),
                path_cost: 0.0,
                distance: Some(0.0),
            },
        ]
    }

    #[test]
    fn test_export_master_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.csv");

        let mut table = ResultTable::new();
        for row in sample_rows() {
            table.push(row);
        }
        table.export_csv(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Source,Dest,PathCost,Distance");
        assert_eq!(lines[1], "Abiquiu,Chama,1234.5,987.25");
        // NA sentinel, not zero
        assert_eq!(lines[2], "Abiquiu,Ojo,55,NA");
        // Genuine zero stays zero
        assert_eq!(lines[3], "Chama,Ojo,0,0");
    }

    #[test]
    fn test_export_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("master.csv");

        ResultTable::new().export_csv(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim(), "Source,Dest,PathCost,Distance");
    }

    #[test]
    fn test_write_pair_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tb_ab_ch.csv");

        write_pair_table(&path, &sample_rows()[0]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("Abiquiu,Chama"));
    }
}
