//! # lcpath analysis
//!
//! The pairwise least-cost-path workflow: for every ordered pair drawn
//! from two location sets, build (once per source) an accumulated-cost and
//! backlink surface over the DEM, trace the least-cost path to each
//! destination, vectorize and measure it, and record one row per pair
//! into a master table exported at run end.
//!
//! Per-pair problems never halt the run: failures are written to the run
//! log and the driver continues with the next pair. The log file is the
//! authoritative record of what succeeded, degraded, or was skipped.

pub mod config;
pub mod driver;
pub mod results;
pub mod run_log;
pub mod workspace;

pub use config::RunConfig;
pub use driver::{run, RunSummary};
pub use results::{ResultRow, ResultTable};
pub use run_log::RunLog;
pub use workspace::OutputTree;
