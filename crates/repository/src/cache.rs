use crate::error::Result;
use crate::format::RepoFormat;
use crate::scanner::{scan, Repository};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Scanned repositories, keyed by (root, format). Only the index is cached;
/// extraction and overlap results are recomputed per request.
static REPO_CACHE: Lazy<Mutex<HashMap<(PathBuf, RepoFormat), Arc<Repository>>>> =
    Lazy::new(Mutex::default);

/// Scan `root` under `format`, reusing a previous scan of the same pair.
pub fn repository_for(root: &Path, format: RepoFormat) -> Result<Arc<Repository>> {
    let key = (root.to_path_buf(), format);

    if let Some(repo) = REPO_CACHE
        .lock()
        .expect("repository cache mutex poisoned")
        .get(&key)
    {
        log::debug!("Reusing scanned index for {} ({format})", root.display());
        return Ok(repo.clone());
    }

    let repo = Arc::new(scan(root, format)?);
    REPO_CACHE
        .lock()
        .expect("repository cache mutex poisoned")
        .insert(key, repo.clone());
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn same_root_and_format_reuse_one_index() {
        let temp = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(temp.path().join("g/m")).expect("mkdir");
        std::fs::write(temp.path().join("g/m/lh.area.stack1.coef.mgh"), b"").expect("touch");

        let first = repository_for(temp.path(), RepoFormat::Verywise).expect("first");
        let second = repository_for(temp.path(), RepoFormat::Verywise).expect("second");
        assert!(Arc::ptr_eq(&first, &second));
    }
}
