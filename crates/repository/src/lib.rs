//! # Vertexwise Repository
//!
//! Discovery layer for vertex-wise analysis output trees.
//!
//! ## Pipeline
//!
//! ```text
//! Location (path or GitHub tree URL)
//!     │
//!     ├──> resolve_location (remote trees mirrored once per URL)
//!     │      └─> local directory
//!     │
//!     ├──> scan (Verywise / QDECR layout)
//!     │      └─> Repository: groups -> models -> (hemisphere, measure)
//!     │
//!     └──> terms_for
//!            └─> TermIndex: stack id -> label
//! ```

mod cache;
mod error;
mod format;
mod location;
mod progress;
mod remote;
mod scanner;
mod terms;

pub use cache::repository_for;
pub use error::{RepositoryError, Result};
pub use format::{MapPaths, RepoFormat, COEF_SUFFIX, MAP_EXTENSION, OCN_SUFFIX};
pub use location::resolve_location;
pub use progress::{NullProgress, ProgressReporter};
pub use scanner::{scan, GroupIndex, ModelEntry, ModelKey, Repository};
pub use terms::{terms_for, TermIndex, TERM_INDEX_FILE};
