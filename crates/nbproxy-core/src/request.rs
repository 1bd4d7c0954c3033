//! The fixed download request of the NetBeans `download-all-extbins` target.

use std::path::{Path, PathBuf};

use crate::fileset::FileSet;
use crate::task::DownloadOptions;

/// Location of the binaries cache, relative to the working directory.
pub const BINARIES_CACHE: &str = "hgexternalcache";

/// Value of `binaries.server` in the NetBeans build.
pub const BINARIES_SERVER: &str = "https://netbeans.osuosl.org/binaries/";

/// Value of `binaries.repos` in the NetBeans build.
pub const BINARIES_REPOS: &str = "https://repo1.maven.org/maven2/";

/// Manifests included by `download-all-extbins`.
pub const MANIFEST_INCLUDE: &str = "**/external/binaries-list";

/// Immutable configuration bundle handed to the download task once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    cache_directory: PathBuf,
    server_url: String,
    repository_url: String,
    manifest_glob: String,
    search_root: PathBuf,
}

impl Default for DownloadRequest {
    fn default() -> Self {
        Self::netbeans()
    }
}

impl DownloadRequest {
    /// The request the proxy tests run: fixed literals, search from `.`.
    pub fn netbeans() -> Self {
        Self {
            cache_directory: PathBuf::from(BINARIES_CACHE),
            server_url: BINARIES_SERVER.to_string(),
            repository_url: BINARIES_REPOS.to_string(),
            manifest_glob: MANIFEST_INCLUDE.to_string(),
            search_root: PathBuf::from("."),
        }
    }

    pub fn cache_directory(&self) -> &Path {
        &self.cache_directory
    }

    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    pub fn repository_url(&self) -> &str {
        &self.repository_url
    }

    pub fn manifest_glob(&self) -> &str {
        &self.manifest_glob
    }

    pub fn search_root(&self) -> &Path {
        &self.search_root
    }

    /// File-selection rule for the manifests.
    pub fn file_set(&self) -> FileSet {
        FileSet::new(&self.search_root).include(&self.manifest_glob)
    }

    pub fn into_options(self) -> DownloadOptions {
        let manifests = vec![self.file_set()];
        DownloadOptions {
            cache_directory: self.cache_directory,
            server_url: self.server_url,
            repository_url: self.repository_url,
            manifests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals_are_fixed() {
        let req = DownloadRequest::netbeans();
        assert_eq!(req.cache_directory(), Path::new("hgexternalcache"));
        assert_eq!(req.server_url(), "https://netbeans.osuosl.org/binaries/");
        assert_eq!(req.repository_url(), "https://repo1.maven.org/maven2/");
        assert_eq!(req.manifest_glob(), "**/external/binaries-list");
        assert_eq!(req.search_root(), Path::new("."));
        assert_eq!(req, DownloadRequest::default());
    }

    #[test]
    fn file_set_uses_working_directory_and_manifest_glob() {
        let set = DownloadRequest::netbeans().file_set();
        assert_eq!(set.root(), Path::new("."));
        assert_eq!(set.includes(), ["**/external/binaries-list".to_string()]);
    }

    #[test]
    fn options_carry_every_value() {
        let opts = DownloadRequest::netbeans().into_options();
        assert_eq!(opts.cache_directory, PathBuf::from(BINARIES_CACHE));
        assert_eq!(opts.server_url, BINARIES_SERVER);
        assert_eq!(opts.repository_url, BINARIES_REPOS);
        assert_eq!(opts.manifests, vec![DownloadRequest::netbeans().file_set()]);
    }
}
