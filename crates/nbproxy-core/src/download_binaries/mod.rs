//! The `downloadbinaries` task.
//!
//! Finds every manifest selected by the configured file sets and makes sure
//! each listed binary sits next to its manifest with the expected hash,
//! going through the cache directory and, when needed, the network.
//! Fail-fast: the first binary that cannot be obtained ends the run.

mod resolve;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::NetworkConfig;
use crate::context::{ExecutionContext, TaskLog};
use crate::manifest::{parse_manifest, ManifestEntry};
use crate::proxy;
use crate::task::{DownloadOptions, DownloadTask, TaskFailure};

pub use resolve::{candidate_urls, EntryOutcome};

pub const TASK_NAME: &str = "downloadbinaries";

/// Counters reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub manifests: usize,
    pub up_to_date: usize,
    pub from_cache: usize,
    pub downloaded: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::UpToDate => self.up_to_date += 1,
            EntryOutcome::FromCache => self.from_cache += 1,
            EntryOutcome::Downloaded { .. } => self.downloaded += 1,
        }
    }
}

pub struct DownloadBinaries {
    network: NetworkConfig,
    options: Option<DownloadOptions>,
    last_summary: Option<RunSummary>,
}

impl DownloadBinaries {
    pub fn new(network: NetworkConfig) -> Self {
        Self {
            network,
            options: None,
            last_summary: None,
        }
    }

    /// Counters of the last successful `execute`.
    pub fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary
    }

    fn run(&self, options: &DownloadOptions, log: &TaskLog<'_>) -> Result<RunSummary, TaskFailure> {
        proxy::report(&proxy::settings_from_env(), log);

        let manifests = collect_manifests(options)?;
        log.debug(format!("found {} manifest(s)", manifests.len()));

        let mut summary = RunSummary {
            manifests: manifests.len(),
            ..RunSummary::default()
        };
        for manifest in &manifests {
            let entries = load_manifest(manifest)?;
            log.debug(format!(
                "{}: {} binar{}",
                manifest.display(),
                entries.len(),
                if entries.len() == 1 { "y" } else { "ies" }
            ));
            for entry in &entries {
                let outcome = resolve::ensure_entry(manifest, entry, options, &self.network, log)?;
                if let EntryOutcome::Downloaded { url } = &outcome {
                    log.info(format!("{} fetched from {}", entry.resource, url));
                }
                summary.record(&outcome);
            }
        }
        Ok(summary)
    }
}

impl DownloadTask for DownloadBinaries {
    fn name(&self) -> &str {
        TASK_NAME
    }

    fn configure(&mut self, options: DownloadOptions) {
        self.options = Some(options);
    }

    fn execute(&mut self, ctx: &ExecutionContext) -> Result<(), TaskFailure> {
        let options = self
            .options
            .as_ref()
            .ok_or_else(|| TaskFailure::NotConfigured(TASK_NAME.to_string()))?;
        let log = ctx.task_log(TASK_NAME);
        let summary = self.run(options, &log)?;
        log.info(format!(
            "{} manifest(s): {} downloaded, {} from cache, {} up to date",
            summary.manifests, summary.downloaded, summary.from_cache, summary.up_to_date
        ));
        self.last_summary = Some(summary);
        Ok(())
    }
}

/// Every selected manifest across all file sets, each path once, in order.
fn collect_manifests(options: &DownloadOptions) -> Result<Vec<PathBuf>, TaskFailure> {
    let mut all = Vec::new();
    for set in &options.manifests {
        let found = set.scan().map_err(|source| TaskFailure::Scan {
            root: set.root().to_path_buf(),
            source,
        })?;
        for path in found {
            if !all.contains(&path) {
                all.push(path);
            }
        }
    }
    Ok(all)
}

fn load_manifest(path: &Path) -> Result<Vec<ManifestEntry>, TaskFailure> {
    let text = fs::read_to_string(path).map_err(|source| TaskFailure::ReadManifest {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifest(&text).map_err(|source| TaskFailure::Manifest {
        path: path.to_path_buf(),
        source,
    })
}
