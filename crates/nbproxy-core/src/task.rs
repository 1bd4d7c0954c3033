//! Download-task interface.
//!
//! The runner only talks to [`DownloadTask`]; the real implementation is
//! [`crate::download_binaries::DownloadBinaries`], tests plug in fakes.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::context::ExecutionContext;
use crate::fileset::FileSet;
use crate::manifest::ManifestError;

/// Everything a download task needs before it can execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOptions {
    pub cache_directory: PathBuf,
    pub server_url: String,
    pub repository_url: String,
    pub manifests: Vec<FileSet>,
}

pub trait DownloadTask {
    fn name(&self) -> &str;

    /// Replace the task's options. Called once before `execute`.
    fn configure(&mut self, options: DownloadOptions);

    /// Run to completion. Blocks; reports progress through `ctx`.
    fn execute(&mut self, ctx: &ExecutionContext) -> Result<(), TaskFailure>;
}

/// One source that was tried for a binary and why it did not work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedAttempt {
    pub url: String,
    pub cause: String,
}

fn format_attempts(attempts: &[FailedAttempt]) -> String {
    if attempts.is_empty() {
        return " (no sources to try)".to_string();
    }
    attempts
        .iter()
        .map(|a| format!("\n  {}: {}", a.url, a.cause))
        .collect()
}

/// The one failure category the runner sees.
#[derive(Debug, thiserror::Error)]
pub enum TaskFailure {
    #[error("task {0} executed before it was configured")]
    NotConfigured(String),

    #[error("cannot scan {} for manifests: {source}", .root.display())]
    Scan {
        root: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read manifest {}: {source}", .path.display())]
    ReadManifest {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },

    #[error(
        "could not download {resource} requested by {}{}",
        .manifest.display(),
        format_attempts(.attempts)
    )]
    Download {
        resource: String,
        manifest: PathBuf,
        attempts: Vec<FailedAttempt>,
    },

    #[error("{action} {}: {source}", .path.display())]
    Filesystem {
        action: FsAction,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What the task was doing when a filesystem call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsAction {
    Hash,
    CreateCache,
    WriteCache,
    Install,
    Remove,
}

impl fmt::Display for FsAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FsAction::Hash => "cannot hash",
            FsAction::CreateCache => "cannot create cache directory",
            FsAction::WriteCache => "cannot write cache file",
            FsAction::Install => "cannot install",
            FsAction::Remove => "cannot remove",
        })
    }
}

impl TaskFailure {
    pub(crate) fn fs(action: FsAction, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| TaskFailure::Filesystem {
            action,
            path,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_failure_lists_every_attempt() {
        let failure = TaskFailure::Download {
            resource: "asm-9.5.jar".into(),
            manifest: PathBuf::from("ide/external/binaries-list"),
            attempts: vec![
                FailedAttempt {
                    url: "https://server/ABC-asm-9.5.jar".into(),
                    cause: "HTTP 404".into(),
                },
                FailedAttempt {
                    url: "https://repo/org/ow2/asm/asm/9.5/asm-9.5.jar".into(),
                    cause: "Couldn't connect to server".into(),
                },
            ],
        };
        let text = failure.to_string();
        assert!(text.starts_with(
            "could not download asm-9.5.jar requested by ide/external/binaries-list"
        ));
        assert!(text.contains("\n  https://server/ABC-asm-9.5.jar: HTTP 404"));
        assert!(text.contains("Couldn't connect to server"));
    }

    #[test]
    fn filesystem_failure_names_action_and_path() {
        let make = TaskFailure::fs(FsAction::Install, "ide/external/asm.jar");
        let failure = make(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(
            failure.to_string(),
            "cannot install ide/external/asm.jar: denied"
        );
    }
}
