use std::path::PathBuf;
use thiserror::Error;

/// Result type for repository discovery
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Root location is neither a local directory nor a recognized remote reference
    #[error("Unsupported location: {0}")]
    UnsupportedLocation(String),

    /// Expected directory nesting is absent
    #[error("Malformed repository: {0}")]
    MalformedRepository(String),

    /// `stack_names.txt` absent for a resolved model/measure
    #[error("Missing term index file: {0}")]
    MissingTermIndex(PathBuf),

    /// Transport failure while mirroring a remote tree; single attempt, never retried
    #[error("Remote fetch failed: {0}")]
    RemoteFetch(#[from] reqwest::Error),

    /// Model key not in `group/model` form, or not present in the scanned tree
    #[error("Unknown model: {0}")]
    UnknownModel(String),
}
