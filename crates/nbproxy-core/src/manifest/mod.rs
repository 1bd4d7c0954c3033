//! `binaries-list` manifests.
//!
//! Each non-comment line is `<HEX-HASH> <resource>`, where the resource is a
//! plain file name (served from the binaries server as `HASH-name`) or a Maven
//! coordinate in Gradle notation (also looked up in the repository mirror).

mod maven;
mod parse;

pub use maven::MavenCoordinate;
pub use parse::{parse_manifest, ManifestError};

use std::fmt;

/// Digest family, inferred from the hex length in the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha1,
    Sha256,
}

/// Digest a binary must have, normalized to uppercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedHash {
    algorithm: HashAlgorithm,
    hex: String,
}

impl ExpectedHash {
    /// Accepts 40 (SHA-1) or 64 (SHA-256) hex digits in either case.
    pub fn parse(s: &str) -> Option<Self> {
        if !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let algorithm = match s.len() {
            40 => HashAlgorithm::Sha1,
            64 => HashAlgorithm::Sha256,
            _ => return None,
        };
        Some(Self {
            algorithm,
            hex: s.to_ascii_uppercase(),
        })
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub fn as_hex(&self) -> &str {
        &self.hex
    }

    pub fn matches(&self, actual_hex: &str) -> bool {
        self.hex.eq_ignore_ascii_case(actual_hex)
    }
}

impl fmt::Display for ExpectedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

/// What a manifest line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    File(String),
    Maven(MavenCoordinate),
}

impl Resource {
    /// Name the binary gets next to its manifest and inside the cache.
    pub fn file_name(&self) -> String {
        match self {
            Resource::File(name) => name.clone(),
            Resource::Maven(coord) => coord.file_name(),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::File(name) => f.write_str(name),
            Resource::Maven(coord) => fmt::Display::fmt(coord, f),
        }
    }
}

/// One parsed manifest line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub hash: ExpectedHash,
    pub resource: Resource,
    /// 1-based line number, for diagnostics.
    pub line: usize,
}

impl ManifestEntry {
    /// Cache key: `HASH-filename`.
    pub fn cache_name(&self) -> String {
        format!("{}-{}", self.hash, self.resource.file_name())
    }
}
