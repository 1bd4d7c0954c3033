//! Checksum verification of downloaded and cached binaries.
//!
//! Manifests carry SHA-1 digests; SHA-256 is accepted as well. Files are read
//! in chunks so large archives do not have to fit in memory.

use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::manifest::{ExpectedHash, HashAlgorithm};

const BUF_SIZE: usize = 64 * 1024;

fn digest_path<D: Digest>(path: &Path) -> io::Result<String> {
    let mut f = File::open(path)?;
    let mut hasher = D::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Lowercase hex digest of a file.
pub fn hash_path(path: &Path, algorithm: HashAlgorithm) -> io::Result<String> {
    match algorithm {
        HashAlgorithm::Sha1 => digest_path::<Sha1>(path),
        HashAlgorithm::Sha256 => digest_path::<Sha256>(path),
    }
}

/// True when the file's digest equals `expected` (case-insensitive).
pub fn matches(path: &Path, expected: &ExpectedHash) -> io::Result<bool> {
    let actual = hash_path(path, expected.algorithm())?;
    Ok(expected.matches(&actual))
}
