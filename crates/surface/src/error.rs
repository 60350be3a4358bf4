use std::path::PathBuf;
use thiserror::Error;

/// Result type for surface-map decoding
pub type Result<T> = std::result::Result<T, SurfaceError>;

#[derive(Error, Debug)]
pub enum SurfaceError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Header is not a recognized surface-map format
    #[error("Unsupported surface-map format in {path}: {reason}")]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// File ends before the declared number of values
    #[error("Truncated surface map {path}: expected {expected} bytes of data, found {found}")]
    Truncated {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    /// Two maps that must share a mesh resolution do not
    #[error("Surface map length mismatch: {left} vs {right} vertices")]
    LengthMismatch { left: usize, right: usize },
}
