use crate::error::{RepositoryError, Result};
use crate::progress::ProgressReporter;
use crate::remote;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};

/// `https://github.com/<user>/<repo>/tree/<branch>/<path>`
pub(crate) static GITHUB_TREE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://github\.com/([^/]+)/([^/]+)/tree/([^/]+)/(.+)$").expect("valid regex")
});

/// Resolve a raw root location to a local directory.
///
/// An existing local directory passes through unchanged; a GitHub folder URL
/// is mirrored once per process; everything else is unsupported.
pub fn resolve_location(raw: &str, progress: &dyn ProgressReporter) -> Result<PathBuf> {
    let path = Path::new(raw);
    if path.is_dir() {
        return Ok(path.to_path_buf());
    }

    if GITHUB_TREE_RE.is_match(raw) {
        return remote::fetch_cached(raw, progress);
    }

    Err(RepositoryError::UnsupportedLocation(raw.to_string()))
}
