//! Run configuration
//!
//! All user-set parameters for one batch run, fixed before the run starts
//! and threaded explicitly through the driver — there is no ambient global
//! state.

use std::path::PathBuf;

/// Parameters for one pairwise analysis run
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Base output directory; subtrees and the master table live under it
    pub output_dir: PathBuf,
    /// Repeat the analysis with source/destination roles swapped.
    ///
    /// Costs are anisotropic, so A→B and B→A are independent analyses.
    /// Ignored when the two location sets are identical: one pass already
    /// covers every ordered pair.
    pub round_trip: bool,
    /// Persist per-pair cost-path rasters and tables for auditing
    pub keep_intermediate: bool,
    /// Douglas-Peucker tolerance for path polylines, in CRS units
    pub simplify_tolerance: f64,
    /// Description of the first location set, recorded in the log header
    pub set_one_label: String,
    /// Description of the second location set, recorded in the log header
    pub set_two_label: String,
}

impl RunConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            round_trip: false,
            keep_intermediate: false,
            simplify_tolerance: 1.0,
            set_one_label: "location set one".to_string(),
            set_two_label: "location set two".to_string(),
        }
    }
}
