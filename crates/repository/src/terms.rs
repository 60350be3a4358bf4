use crate::error::{RepositoryError, Result};
use crate::scanner::{ModelKey, Repository};
use std::collections::BTreeMap;

/// Tab-separated term index file (`stack_number`, `stack_name`) kept next to
/// the result maps.
pub const TERM_INDEX_FILE: &str = "stack_names.txt";

/// Ordered stack id -> label mapping for one (model, measure).
pub type TermIndex = BTreeMap<u32, String>;

/// Read the ordered term list for a resolved model/measure.
///
/// The first data row is always the model intercept and is never exposed,
/// whatever its label says.
pub fn terms_for(repo: &Repository, key: &ModelKey, measure: &str) -> Result<TermIndex> {
    if repo.model_entry(key).is_none() {
        return Err(RepositoryError::UnknownModel(key.to_string()));
    }

    let path = repo.term_index_dir(key, measure).join(TERM_INDEX_FILE);
    if !path.is_file() {
        return Err(RepositoryError::MissingTermIndex(path));
    }

    let raw = std::fs::read_to_string(&path)?;
    let mut terms = TermIndex::new();

    // Line 0 is the column header, line 1 the intercept row.
    for line in raw.lines().skip(2) {
        if line.trim().is_empty() {
            continue;
        }
        let Some((number, name)) = line.split_once('\t') else {
            return Err(RepositoryError::MalformedRepository(format!(
                "term index row without tab separator in {}: '{line}'",
                path.display()
            )));
        };
        let id: u32 = number.trim().parse().map_err(|_| {
            RepositoryError::MalformedRepository(format!(
                "non-numeric stack number in {}: '{line}'",
                path.display()
            ))
        })?;
        terms.insert(id, name.trim().to_string());
    }

    log::debug!("Resolved {} term(s) for {key} ({measure})", terms.len());
    Ok(terms)
}
