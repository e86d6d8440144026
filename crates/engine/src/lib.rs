//! # lcpath engine
//!
//! The raster-analysis primitives behind the pairwise least-cost-path
//! workflow:
//!
//! - **cost_model**: slope→cost vertical-factor tables
//! - **surface**: anisotropic accumulated-cost + backlink surface generation
//! - **path**: least-cost path extraction by backlink tracing
//! - **vectorize**: path-to-polyline conversion and planar measurement
//!
//! All operations are synchronous and single-threaded; the driver in
//! `lcpath-analysis` sequences them per location pair.

pub mod cost_model;
pub mod path;
pub mod surface;
pub mod vectorize;

pub use cost_model::VerticalFactor;
pub use path::{cost_path, CostPath};
pub use surface::{path_distance, CostSurface};
pub use vectorize::{vectorize_path, PathPolyline, VectorizeParams};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cost_model::VerticalFactor;
    pub use crate::path::{cost_path, CostPath};
    pub use crate::surface::{path_distance, CostSurface};
    pub use crate::vectorize::{vectorize_path, PathPolyline, VectorizeParams};
    pub use lcpath_core::prelude::*;
}
