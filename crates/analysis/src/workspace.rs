//! Output workspace provisioning
//!
//! Ensures the per-direction output directory subtree exists and provides
//! the deterministic artifact paths keyed by location identifiers. All
//! directory creation goes through `create_dir_all`, so provisioning an
//! existing tree is a no-op and reruns are safe.

use lcpath_core::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Subdirectory holding accumulated-cost surfaces (`pd_<id>.tif`)
pub const DIR_SURFACES: &str = "pathdis";
/// Subdirectory holding backlink surfaces (`bl_<id>.tif`)
pub const DIR_BACKLINKS: &str = "backlink";
/// Subdirectory holding vectorized paths (`pl_<src>_<dst>.geojson`)
pub const DIR_POLYLINES: &str = "polylines";
/// Subdirectory holding raw cost-path rasters (`cp_<src>_<dst>.tif`)
pub const DIR_COSTPATHS: &str = "costpath";
/// Subdirectory holding per-pair tables (`tb_<src>_<dst>.csv`)
pub const DIR_TABLES: &str = "tables";

/// One direction's provisioned output subtree
#[derive(Debug, Clone)]
pub struct OutputTree {
    root: PathBuf,
    keep_intermediate: bool,
}

impl OutputTree {
    /// Create the subtree under `root`, including the intermediate-data
    /// folders when those artifacts are being retained. Idempotent.
    pub fn provision(root: impl Into<PathBuf>, keep_intermediate: bool) -> Result<Self> {
        let root = root.into();

        fs::create_dir_all(root.join(DIR_SURFACES))?;
        fs::create_dir_all(root.join(DIR_BACKLINKS))?;
        fs::create_dir_all(root.join(DIR_POLYLINES))?;
        if keep_intermediate {
            fs::create_dir_all(root.join(DIR_COSTPATHS))?;
            fs::create_dir_all(root.join(DIR_TABLES))?;
        }

        Ok(Self {
            root,
            keep_intermediate,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Accumulated-cost surface path for a source location
    pub fn surface_path(&self, loc_id: &str) -> PathBuf {
        self.root.join(DIR_SURFACES).join(format!("pd_{}.tif", loc_id))
    }

    /// Backlink surface path for a source location
    pub fn backlink_path(&self, loc_id: &str) -> PathBuf {
        self.root.join(DIR_BACKLINKS).join(format!("bl_{}.tif", loc_id))
    }

    /// Vectorized path for an ordered pair
    pub fn polyline_path(&self, src_id: &str, dst_id: &str) -> PathBuf {
        self.root
            .join(DIR_POLYLINES)
            .join(format!("pl_{}_{}.geojson", src_id, dst_id))
    }

    /// Raw cost-path raster for an ordered pair (intermediate data)
    pub fn costpath_path(&self, src_id: &str, dst_id: &str) -> PathBuf {
        self.root
            .join(DIR_COSTPATHS)
            .join(format!("cp_{}_{}.tif", src_id, dst_id))
    }

    /// Per-pair result table for an ordered pair (intermediate data)
    pub fn table_path(&self, src_id: &str, dst_id: &str) -> PathBuf {
        self.root
            .join(DIR_TABLES)
            .join(format!("tb_{}_{}.csv", src_id, dst_id))
    }

    /// Whether intermediate artifacts are retained in this tree
    pub fn keeps_intermediate(&self) -> bool {
        self.keep_intermediate
    }
}
