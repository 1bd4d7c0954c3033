//! File lifecycle for cached and installed binaries.
//!
//! Downloads land in `<name>.part` and are renamed into place only after
//! verification; installs copy through a temp file in the destination
//! directory so a reader never sees a half-written binary.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.jar` → `a.jar.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Rename a finished temp file onto its final path, replacing any old file.
pub fn finalize(temp: &Path, final_path: &Path) -> io::Result<()> {
    fs::rename(temp, final_path)
}

/// Copy `src` to `dest` via `dest.part`, then rename. Returns bytes copied.
pub fn install_copy(src: &Path, dest: &Path) -> io::Result<u64> {
    let tmp = temp_path(dest);
    let copied = fs::copy(src, &tmp).and_then(|n| fs::rename(&tmp, dest).map(|()| n));
    if copied.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    copied
}

/// Remove a file, treating "already gone" as success.
pub fn remove_if_exists(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}
