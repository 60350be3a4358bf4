use crate::error::{RepositoryError, Result};
use crate::scanner::{ModelEntry, ModelKey, Repository};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use vertexwise_surface::Hemisphere;

/// Extension of the per-vertex surface-map files.
pub const MAP_EXTENSION: &str = "mgh";

/// Filename tail of a cluster-significance map (cached cluster-forming
/// threshold 3.0, absolute sign convention, output cluster numbers).
pub const OCN_SUFFIX: &str = "cache.th30.abs.sig.ocn.mgh";

/// Filename tail of a coefficient map.
pub const COEF_SUFFIX: &str = "coef.mgh";

/// The two supported directory-format conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoFormat {
    /// Flat model directories, hemisphere+measure+term embedded in filenames.
    Verywise,
    /// One `lh|rh.model.measure` directory per hemisphere, term-only filenames.
    Qdecr,
}

impl RepoFormat {
    pub(crate) fn layout(&self) -> &'static dyn FormatLayout {
        match self {
            RepoFormat::Verywise => &VerywiseLayout,
            RepoFormat::Qdecr => &QdecrLayout,
        }
    }
}

impl FromStr for RepoFormat {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "verywise" => Ok(RepoFormat::Verywise),
            "qdecr" => Ok(RepoFormat::Qdecr),
            other => Err(RepositoryError::UnsupportedLocation(format!(
                "unknown results format '{other}' (expected 'verywise' or 'qdecr')"
            ))),
        }
    }
}

impl std::fmt::Display for RepoFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoFormat::Verywise => f.write_str("verywise"),
            RepoFormat::Qdecr => f.write_str("qdecr"),
        }
    }
}

/// Cluster-map and coefficient-map locations for one (model, term, measure, hemisphere).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapPaths {
    pub cluster: PathBuf,
    pub coef: PathBuf,
}

/// The "directory format" capability: discover models inside a group, locate
/// the term index, and name the per-hemisphere map files. Two explicit
/// implementations, no string branching at call sites.
pub(crate) trait FormatLayout: Sync {
    fn discover_models(&self, group: &str, group_dir: &Path)
        -> Result<BTreeMap<String, ModelEntry>>;

    /// Directory holding `stack_names.txt` for this model/measure.
    fn term_index_dir(&self, repo: &Repository, key: &ModelKey, measure: &str) -> PathBuf;

    fn map_paths(
        &self,
        repo: &Repository,
        key: &ModelKey,
        measure: &str,
        term: u32,
        hemi: Hemisphere,
    ) -> MapPaths;
}

pub(crate) struct VerywiseLayout;

impl VerywiseLayout {
    fn model_dir(root: &Path, key: &ModelKey) -> PathBuf {
        if key.group == key.model {
            root.join(&key.group)
        } else {
            root.join(&key.group).join(&key.model)
        }
    }

    /// (hemisphere, measure) pairs from `lh.thickness.stack3.coef.mgh`-style names.
    fn pairs_in(dir: &Path) -> Result<ModelEntry> {
        let mut entry = ModelEntry::default();
        for name in map_file_names(dir)? {
            let mut tokens = name.split('.');
            let hemi_token = tokens.next().unwrap_or_default();
            let Some(hemi) = Hemisphere::from_token(hemi_token) else {
                log::warn!("Skipping {} in {}: unknown hemisphere token", name, dir.display());
                continue;
            };
            let Some(measure) = tokens.next() else {
                log::warn!("Skipping {} in {}: no measure token", name, dir.display());
                continue;
            };
            entry.pairs.insert((hemi, measure.to_string()));
        }
        Ok(entry)
    }
}

impl FormatLayout for VerywiseLayout {
    fn discover_models(
        &self,
        group: &str,
        group_dir: &Path,
    ) -> Result<BTreeMap<String, ModelEntry>> {
        let subdirs = visible_subdirs(group_dir)?;
        let mut models = BTreeMap::new();

        if subdirs.is_empty() {
            // Deepest level already: the group is its own model.
            models.insert(group.to_string(), Self::pairs_in(group_dir)?);
        } else {
            for (name, path) in subdirs {
                models.insert(name, Self::pairs_in(&path)?);
            }
        }
        Ok(models)
    }

    fn term_index_dir(&self, repo: &Repository, key: &ModelKey, _measure: &str) -> PathBuf {
        Self::model_dir(&repo.root, key)
    }

    fn map_paths(
        &self,
        repo: &Repository,
        key: &ModelKey,
        measure: &str,
        term: u32,
        hemi: Hemisphere,
    ) -> MapPaths {
        let dir = Self::model_dir(&repo.root, key);
        let stem = format!("{}.{measure}.stack{term}", hemi.prefix());
        MapPaths {
            cluster: dir.join(format!("{stem}.{OCN_SUFFIX}")),
            coef: dir.join(format!("{stem}.{COEF_SUFFIX}")),
        }
    }
}

pub(crate) struct QdecrLayout;

impl QdecrLayout {
    fn hemi_dir(root: &Path, key: &ModelKey, measure: &str, hemi: Hemisphere) -> PathBuf {
        root.join(&key.group)
            .join(format!("{}.{}.{measure}", hemi.prefix(), key.model))
    }
}

impl FormatLayout for QdecrLayout {
    fn discover_models(
        &self,
        group: &str,
        group_dir: &Path,
    ) -> Result<BTreeMap<String, ModelEntry>> {
        let subdirs = visible_subdirs(group_dir)?;
        if subdirs.is_empty() {
            return Err(RepositoryError::MalformedRepository(format!(
                "group '{group}' has no hemisphere.model.measure subdirectories"
            )));
        }

        let mut models: BTreeMap<String, ModelEntry> = BTreeMap::new();
        for (name, _) in subdirs {
            let tokens: Vec<&str> = name.split('.').collect();
            let &[hemi_token, model, measure] = &tokens[..] else {
                log::warn!("Skipping {name} in group '{group}': not hemi.model.measure");
                continue;
            };
            let Some(hemi) = Hemisphere::from_token(hemi_token) else {
                log::warn!("Skipping {name} in group '{group}': unknown hemisphere token");
                continue;
            };
            models
                .entry(model.to_string())
                .or_default()
                .pairs
                .insert((hemi, measure.to_string()));
        }
        Ok(models)
    }

    fn term_index_dir(&self, repo: &Repository, key: &ModelKey, measure: &str) -> PathBuf {
        // Assumes both hemispheres were run with the same model list; an
        // arbitrary representative hemisphere stands in for both.
        let hemi = repo
            .model_entry(key)
            .and_then(|entry| entry.representative_hemi(measure))
            .unwrap_or(Hemisphere::Left);
        Self::hemi_dir(&repo.root, key, measure, hemi)
    }

    fn map_paths(
        &self,
        repo: &Repository,
        key: &ModelKey,
        measure: &str,
        term: u32,
        hemi: Hemisphere,
    ) -> MapPaths {
        let dir = Self::hemi_dir(&repo.root, key, measure, hemi);
        MapPaths {
            cluster: dir.join(format!("stack{term}.{OCN_SUFFIX}")),
            coef: dir.join(format!("stack{term}.{COEF_SUFFIX}")),
        }
    }
}

/// Non-hidden subdirectories, sorted by name.
pub(crate) fn visible_subdirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type()?.is_dir() {
            out.push((name, entry.path()));
        }
    }
    out.sort();
    Ok(out)
}

/// Names of `.mgh` files directly inside `dir`, sorted.
fn map_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || !entry.file_type()?.is_file() {
            continue;
        }
        if name.ends_with(&format!(".{MAP_EXTENSION}")) {
            out.push(name);
        }
    }
    out.sort();
    Ok(out)
}
