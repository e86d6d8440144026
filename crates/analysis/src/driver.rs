//! Pair iteration driver
//!
//! One parameterized pass walks every (source, destination) ordered pair:
//! the source's cost and backlink surfaces are built once and reused for
//! all destinations, self-pairs are skipped, and every per-source or
//! per-pair failure is logged and stepped over. In round-trip mode over
//! two distinct sets the same pass runs a second time with the roles
//! swapped, writing into a separate subtree, because costs are
//! direction-dependent.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use lcpath_core::io::{write_geotiff, write_geotiff_u8, write_polyline};
use lcpath_core::{Error, Location, LocationSet, Raster, Result};
use lcpath_engine::{
    cost_path, path_distance, vectorize_path, CostSurface, VectorizeParams, VerticalFactor,
};
use tracing::{info, warn};

use crate::config::RunConfig;
use crate::results::{write_pair_table, ResultRow, ResultTable};
use crate::run_log::RunLog;
use crate::workspace::OutputTree;

/// File name of the exported master table
pub const MASTER_TABLE: &str = "master.csv";

/// Counters and artifact locations reported after a run
#[derive(Debug)]
pub struct RunSummary {
    /// Rows recorded in the master table
    pub rows_recorded: usize,
    /// Cost/backlink surface pairs built
    pub surfaces_built: usize,
    /// Sources whose surfaces failed (all their destinations skipped)
    pub sources_failed: usize,
    /// Pairs whose row was omitted entirely (path extraction failed)
    pub pairs_failed: usize,
    /// Path of the exported master table
    pub master_path: PathBuf,
    /// Path of the run log
    pub log_path: PathBuf,
    /// Total wall time
    pub elapsed: std::time::Duration,
}

/// Run the full pairwise analysis.
///
/// Fatal errors (workspace or master table cannot be created) abort the
/// run; everything downstream is partial-failure: logged and skipped.
pub fn run(
    config: &RunConfig,
    dem: &Raster<f64>,
    vf: &VerticalFactor,
    set_one: &LocationSet,
    set_two: &LocationSet,
) -> Result<RunSummary> {
    let started = Instant::now();

    let identical = set_one == set_two;
    let second_pass = config.round_trip && !identical;

    fs::create_dir_all(&config.output_dir)?;
    let log = RunLog::create(&config.output_dir, &config.set_one_label, &config.set_two_label)?;

    // Surfaces are direction-dependent, so a round-trip run gets one
    // subtree per direction of travel.
    let (forward, reverse) = if second_pass {
        (
            OutputTree::provision(config.output_dir.join("forward"), config.keep_intermediate)?,
            Some(OutputTree::provision(
                config.output_dir.join("reverse"),
                config.keep_intermediate,
            )?),
        )
    } else {
        (
            OutputTree::provision(&config.output_dir, config.keep_intermediate)?,
            None,
        )
    };

    let master_path = config.output_dir.join(MASTER_TABLE);
    let table = ResultTable::new();
    // Fail now, before hours of surface work, if the table can't be written
    table.export_csv(&master_path)?;

    let mut pass = Pass {
        config,
        dem,
        vf,
        log,
        table,
        surfaces_built: 0,
        sources_failed: 0,
        pairs_failed: 0,
    };

    pass.run_pass(set_one, set_two, &forward);
    if let Some(reverse) = &reverse {
        info!("round trip: repeating analysis with roles swapped");
        pass.run_pass(set_two, set_one, reverse);
    }

    pass.table.export_csv(&master_path)?;
    info!(
        "master table written to {} ({} rows)",
        master_path.display(),
        pass.table.len()
    );

    Ok(RunSummary {
        rows_recorded: pass.table.len(),
        surfaces_built: pass.surfaces_built,
        sources_failed: pass.sources_failed,
        pairs_failed: pass.pairs_failed,
        master_path,
        log_path: pass.log.path().to_path_buf(),
        elapsed: started.elapsed(),
    })
}

/// State shared by both directions of a run
struct Pass<'a> {
    config: &'a RunConfig,
    dem: &'a Raster<f64>,
    vf: &'a VerticalFactor,
    log: RunLog,
    table: ResultTable,
    surfaces_built: usize,
    sources_failed: usize,
    pairs_failed: usize,
}

impl Pass<'_> {
    fn run_pass(&mut self, sources: &LocationSet, dests: &LocationSet, tree: &OutputTree) {
        for src in sources.iter() {
            info!("calculating cost and backlink surfaces for {}", src.name);

            let surface = match self.build_surface(src, tree) {
                Some(surface) => surface,
                None => {
                    // All destinations paired with this source are skipped
                    self.sources_failed += 1;
                    continue;
                }
            };
            self.surfaces_built += 1;

            for dst in dests.iter() {
                if src.name == dst.name {
                    continue; // Self-pairs never produce a row
                }
                let pair_started = Instant::now();
                if self.process_pair(src, dst, &surface, tree) {
                    info!(
                        "finished least cost path between {} and {} in {:.2?}",
                        src.name,
                        dst.name,
                        pair_started.elapsed()
                    );
                } else {
                    self.pairs_failed += 1;
                }
            }
        }
    }

    /// Build and persist one source's surfaces. Returns `None` (after
    /// logging) on any failure, including persistence.
    fn build_surface(&mut self, src: &Location, tree: &OutputTree) -> Option<CostSurface> {
        let result = self
            .dem
            .cell_for_point(src.x, src.y)
            .ok_or_else(|| Error::OutsideExtent {
                name: src.name.clone(),
                x: src.x,
                y: src.y,
            })
            .and_then(|cell| path_distance(self.dem, self.vf, cell))
            .and_then(|surface| {
                write_geotiff(&surface.cost, tree.surface_path(&src.id))?;
                write_geotiff_u8(&surface.backlink, tree.backlink_path(&src.id))?;
                Ok(surface)
            });

        match result {
            Ok(surface) => Some(surface),
            Err(e) => {
                let message = format!(
                    "Failed to generate cost and backlink surfaces for {}: {}",
                    src.name, e
                );
                warn!("{}", message);
                self.log.entry(&message);
                None
            }
        }
    }

    /// Process one ordered pair. Returns false only when the pair's row
    /// was omitted entirely (path extraction failed); vectorization
    /// problems degrade the distance but still record a row.
    fn process_pair(
        &mut self,
        src: &Location,
        dst: &Location,
        surface: &CostSurface,
        tree: &OutputTree,
    ) -> bool {
        let path = self
            .dem
            .cell_for_point(dst.x, dst.y)
            .ok_or_else(|| Error::OutsideExtent {
                name: dst.name.clone(),
                x: dst.x,
                y: dst.y,
            })
            .and_then(|cell| cost_path(surface, cell, &dst.name));
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                let message = format!(
                    "Failed to calculate least cost path between {} and {}: {}",
                    src.name, dst.name, e
                );
                warn!("{}", message);
                self.log.entry(&message);
                return false;
            }
        };

        let params = VectorizeParams {
            simplify_tolerance: self.config.simplify_tolerance,
        };
        let distance = match vectorize_path(&path, self.dem.transform(), &params) {
            Ok(poly) => {
                let out = tree.polyline_path(&src.id, &dst.id);
                if let Err(e) = write_polyline(&out, &poly.line, &src.name, &dst.name, poly.length)
                {
                    let message = format!(
                        "Failed to save polyline for cost path between {} and {}: {}",
                        src.name, dst.name, e
                    );
                    warn!("{}", message);
                    self.log.entry(&message);
                }
                Some(poly.length)
            }
            Err(Error::DegenerateGeometry(_)) => {
                // Source and destination too close to form a line: distance
                // is genuinely zero, not a failure
                let message = format!(
                    "Cannot convert cost path between {} and {} to a valid polyline; \
                     source and destination may be too close. Distance set to zero",
                    src.name, dst.name
                );
                warn!("{}", message);
                self.log.entry(&message);
                Some(0.0)
            }
            Err(e) => {
                let message = format!(
                    "Cannot convert cost path between {} and {} to a valid polyline: {}. \
                     Distance not calculated",
                    src.name, dst.name, e
                );
                warn!("{}", message);
                self.log.entry(&message);
                None
            }
        };

        let row = ResultRow {
            source: src.name.clone(),
            dest: dst.name.clone(),
            path_cost: path.path_cost,
            distance,
        };

        if tree.keeps_intermediate() {
            if let Err(e) = write_pair_table(&tree.table_path(&src.id, &dst.id), &row) {
                let message = format!(
                    "Failed to save per-pair table for {} and {}: {}",
                    src.name, dst.name, e
                );
                warn!("{}", message);
                self.log.entry(&message);
            }
            let costpath = path.to_raster(self.dem);
            if let Err(e) = write_geotiff_u8(&costpath, tree.costpath_path(&src.id, &dst.id)) {
                let message = format!(
                    "Failed to save cost path raster cp_{}_{}: {}",
                    src.id, dst.id, e
                );
                warn!("{}", message);
                self.log.entry(&message);
            }
        }

        self.table.push(row);
        true
    }
}
