use crate::error::{RepositoryError, Result};
use crate::location::GITHUB_TREE_RE;
use crate::progress::ProgressReporter;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// One mirrored copy per distinct URL for the process lifetime. The outer
/// mutex guards the map; the per-URL slot mutex makes concurrent first
/// requests single-flight instead of racing duplicate downloads.
static FETCH_CACHE: Lazy<Mutex<HashMap<String, Arc<Mutex<Option<PathBuf>>>>>> =
    Lazy::new(Mutex::default);

/// Resolve a GitHub folder URL to a local mirror, fetching at most once.
pub fn fetch_cached(url: &str, progress: &dyn ProgressReporter) -> Result<PathBuf> {
    fetch_cached_with(url, progress, &download_github_folder)
}

pub(crate) fn fetch_cached_with(
    url: &str,
    progress: &dyn ProgressReporter,
    fetch: &dyn Fn(&str, &dyn ProgressReporter) -> Result<PathBuf>,
) -> Result<PathBuf> {
    let slot = FETCH_CACHE
        .lock()
        .expect("fetch cache mutex poisoned")
        .entry(url.to_string())
        .or_default()
        .clone();

    let mut guard = slot.lock().expect("fetch slot mutex poisoned");
    if let Some(local) = guard.as_ref() {
        log::debug!("Reusing mirrored copy of {url} at {}", local.display());
        return Ok(local.clone());
    }

    let local = fetch(url, progress)?;
    *guard = Some(local.clone());
    Ok(local)
}

#[derive(Debug, Deserialize)]
struct ContentsEntry {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    url: String,
    download_url: Option<String>,
}

/// Mirror a GitHub folder into a fresh temp directory via the contents API.
fn download_github_folder(url: &str, progress: &dyn ProgressReporter) -> Result<PathBuf> {
    let caps = GITHUB_TREE_RE
        .captures(url)
        .ok_or_else(|| RepositoryError::UnsupportedLocation(url.to_string()))?;
    let (user, repo, branch, folder) = (&caps[1], &caps[2], &caps[3], &caps[4]);

    let api_url =
        format!("https://api.github.com/repos/{user}/{repo}/contents/{folder}?ref={branch}");

    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("vertexwise/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let token = std::env::var(TOKEN_ENV_VAR).ok();

    let folder_name = folder.rsplit('/').next().unwrap_or(folder);
    let local = tempfile::Builder::new()
        .prefix("vertexwise-")
        .tempdir()?
        .into_path()
        .join(folder_name);
    std::fs::create_dir_all(&local)?;

    log::info!("Mirroring {url} into {}", local.display());
    mirror_contents(&client, token.as_deref(), &api_url, &local, progress)?;
    Ok(local)
}

fn mirror_contents(
    client: &reqwest::blocking::Client,
    token: Option<&str>,
    api_url: &str,
    local_dir: &Path,
    progress: &dyn ProgressReporter,
) -> Result<()> {
    let mut request = client.get(api_url);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }

    let entries: Vec<ContentsEntry> = request.send()?.error_for_status()?.json()?;
    let total = entries.len();
    progress.begin(total);

    for (i, entry) in entries.iter().enumerate() {
        progress.advance(i + 1, total, &entry.name);

        match entry.kind.as_str() {
            "dir" => {
                let subdir = local_dir.join(&entry.name);
                std::fs::create_dir_all(&subdir)?;
                mirror_contents(client, token, &entry.url, &subdir, progress)?;
            }
            "file" => {
                let Some(download_url) = entry.download_url.as_deref() else {
                    log::warn!("Entry {} has no download URL, skipping", entry.name);
                    continue;
                };
                let bytes = client.get(download_url).send()?.error_for_status()?.bytes()?;
                std::fs::write(local_dir.join(&entry.name), &bytes)?;
            }
            other => log::warn!("Skipping {} with unknown entry type '{other}'", entry.name),
        }
    }
    Ok(())
}
