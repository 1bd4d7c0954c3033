//! Bring one manifest entry up to date: installed copy, cache, then network.

use std::fs;
use std::path::Path;

use crate::checksum;
use crate::config::NetworkConfig;
use crate::context::TaskLog;
use crate::fetch::{self, FetchError};
use crate::manifest::{ManifestEntry, Resource};
use crate::storage;
use crate::task::{DownloadOptions, FailedAttempt, FsAction, TaskFailure};

/// How an entry was satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    /// The installed file already had the expected hash.
    UpToDate,
    /// Installed from a verified cache file.
    FromCache,
    /// Fetched from `url`, verified, cached and installed.
    Downloaded { url: String },
}

fn join_url(base: &str, path: &str) -> String {
    if base.ends_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Sources for an entry, in the order they are tried: the binaries server
/// (`HASH-name`), then for Maven coordinates the repository mirror.
pub fn candidate_urls(entry: &ManifestEntry, options: &DownloadOptions) -> Vec<String> {
    let mut urls = vec![join_url(&options.server_url, &entry.cache_name())];
    if let Resource::Maven(coord) = &entry.resource {
        urls.push(join_url(&options.repository_url, &coord.repository_path()));
    }
    urls
}

fn verified(path: &Path, entry: &ManifestEntry) -> Result<bool, TaskFailure> {
    checksum::matches(path, &entry.hash).map_err(TaskFailure::fs(FsAction::Hash, path))
}

pub(super) fn ensure_entry(
    manifest: &Path,
    entry: &ManifestEntry,
    options: &DownloadOptions,
    net: &NetworkConfig,
    log: &TaskLog<'_>,
) -> Result<EntryOutcome, TaskFailure> {
    let file_name = entry.resource.file_name();
    let target = manifest
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(&file_name);

    if target.is_file() {
        if verified(&target, entry)? {
            log.debug(format!("{} is up to date", target.display()));
            return Ok(EntryOutcome::UpToDate);
        }
        log.warn(format!(
            "{} does not match expected hash {}; replacing it",
            target.display(),
            entry.hash
        ));
    }

    let cached = options.cache_directory.join(entry.cache_name());
    let outcome = if cached.is_file() && verified(&cached, entry)? {
        log.debug(format!("using cached {}", cached.display()));
        EntryOutcome::FromCache
    } else {
        if cached.exists() {
            log.warn(format!(
                "cached {} is corrupt; fetching again",
                cached.display()
            ));
            storage::remove_if_exists(&cached).map_err(TaskFailure::fs(FsAction::Remove, &cached))?;
        }
        let url = download_into_cache(manifest, entry, &cached, options, net, log)?;
        EntryOutcome::Downloaded { url }
    };

    storage::install_copy(&cached, &target).map_err(TaskFailure::fs(FsAction::Install, &target))?;
    log.debug(format!("installed {}", target.display()));
    Ok(outcome)
}

/// Try every source until one yields a body with the expected hash; the
/// verified body ends up at `cached`. Returns the URL that worked.
fn download_into_cache(
    manifest: &Path,
    entry: &ManifestEntry,
    cached: &Path,
    options: &DownloadOptions,
    net: &NetworkConfig,
    log: &TaskLog<'_>,
) -> Result<String, TaskFailure> {
    fs::create_dir_all(&options.cache_directory)
        .map_err(TaskFailure::fs(FsAction::CreateCache, &options.cache_directory))?;
    let part = storage::temp_path(cached);
    let mut attempts = Vec::new();

    for url in candidate_urls(entry, options) {
        log.info(format!("Downloading {}", url));
        let cause = match fetch::fetch_to_file(&url, &part, net) {
            Ok(bytes) => match checksum::matches(&part, &entry.hash) {
                Ok(true) => {
                    storage::finalize(&part, cached)
                        .map_err(TaskFailure::fs(FsAction::WriteCache, cached))?;
                    log.debug(format!("{} bytes verified into {}", bytes, cached.display()));
                    return Ok(url);
                }
                Ok(false) => format!("content does not match expected hash {}", entry.hash),
                Err(e) => format!("cannot hash download: {}", e),
            },
            Err(FetchError::Storage(source)) => {
                let _ = storage::remove_if_exists(&part);
                return Err(TaskFailure::Filesystem {
                    action: FsAction::WriteCache,
                    path: part,
                    source,
                });
            }
            Err(e) => e.to_string(),
        };
        log.debug(format!("{} failed: {}", url, cause));
        storage::remove_if_exists(&part).map_err(TaskFailure::fs(FsAction::Remove, &part))?;
        attempts.push(FailedAttempt { url, cause });
    }

    Err(TaskFailure::Download {
        resource: entry.resource.to_string(),
        manifest: manifest.to_path_buf(),
        attempts,
    })
}
