use crate::error::{RepositoryError, Result};
use crate::format::{visible_subdirs, MapPaths, RepoFormat};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use vertexwise_surface::Hemisphere;

/// `group/model` selector. Flat Verywise groups are their own model
/// (`dir1/dir1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModelKey {
    pub group: String,
    pub model: String,
}

impl ModelKey {
    pub fn new(group: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            model: model.into(),
        }
    }
}

impl std::fmt::Display for ModelKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.group, self.model)
    }
}

impl FromStr for ModelKey {
    type Err = RepositoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((group, model)) if !group.is_empty() && !model.is_empty() => {
                Ok(ModelKey::new(group, model))
            }
            _ => Err(RepositoryError::UnknownModel(format!(
                "'{s}' is not of the form group/model"
            ))),
        }
    }
}

/// (hemisphere, measure) pairs found on disk for one model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelEntry {
    pub pairs: BTreeSet<(Hemisphere, String)>,
}

impl ModelEntry {
    pub fn has_pair(&self, hemi: Hemisphere, measure: &str) -> bool {
        self.pairs.iter().any(|(h, m)| *h == hemi && m == measure)
    }

    /// First hemisphere seen for `measure`, used where one hemisphere must
    /// stand in for both.
    pub fn representative_hemi(&self, measure: &str) -> Option<Hemisphere> {
        self.pairs
            .iter()
            .find(|(_, m)| m == measure)
            .map(|(h, _)| *h)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupIndex {
    pub models: BTreeMap<String, ModelEntry>,
}

/// Immutable index of one scanned results tree.
#[derive(Debug, Clone, Serialize)]
pub struct Repository {
    pub root: PathBuf,
    pub format: RepoFormat,
    pub groups: BTreeMap<String, GroupIndex>,
}

impl Repository {
    pub fn model_entry(&self, key: &ModelKey) -> Option<&ModelEntry> {
        self.groups.get(&key.group)?.models.get(&key.model)
    }

    pub(crate) fn term_index_dir(&self, key: &ModelKey, measure: &str) -> PathBuf {
        self.format.layout().term_index_dir(self, key, measure)
    }

    /// Cluster-map and coefficient-map locations per the tree's convention.
    pub fn map_paths(
        &self,
        key: &ModelKey,
        measure: &str,
        term: u32,
        hemi: Hemisphere,
    ) -> MapPaths {
        self.format.layout().map_paths(self, key, measure, term, hemi)
    }
}

/// Enumerate groups and models under `root` per `format`.
///
/// Pure read of filesystem state: deterministic for an unchanged tree, never
/// mutates anything.
pub fn scan(root: &Path, format: RepoFormat) -> Result<Repository> {
    let layout = format.layout();
    let mut groups = BTreeMap::new();

    for (group, group_dir) in visible_subdirs(root)? {
        let models = layout.discover_models(&group, &group_dir)?;
        groups.insert(group, GroupIndex { models });
    }

    log::info!(
        "Scanned {} ({format}): {} group(s)",
        root.display(),
        groups.len()
    );

    Ok(Repository {
        root: root.to_path_buf(),
        format,
        groups,
    })
}
