//! # Vertexwise Stats
//!
//! Extraction and comparison of significance-masked coefficient maps.
//!
//! ## Pipeline
//!
//! ```text
//! Repository + (model, term, measure)
//!     │
//!     ├──> extract
//!     │      └─> ExtractionResult: masked betas, cluster counts, global stats
//!     │
//!     ├──> cluster_stats (single-map display)
//!     │      └─> per-cluster size / mean / min / max
//!     │
//!     └──> compute_overlap (two-map comparison)
//!            └─> per-vertex categories {0,1,2,3} + percentage summary
//! ```
//!
//! Every operation here is a pure function of its inputs: nothing is cached,
//! repeated calls over an unchanged tree return bit-identical results.

mod cluster;
mod error;
mod extract;
mod overlap;

pub use cluster::{cluster_stats, ClusterStat};
pub use error::{Result, StatsError};
pub use extract::{extract, ExtractionResult};
pub use overlap::{compute_overlap, CategoryShare, CategoryVector, OverlapCategory, OverlapMap, OverlapSummary};
