//! File-selection rules: a root directory plus Ant-style include patterns.
//!
//! Patterns are `/`-separated. `**` spans zero or more directories, `*` any
//! run of characters inside one path component, `?` exactly one character.
//! A trailing `/` means "everything below", as in Ant.

use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSet {
    root: PathBuf,
    includes: Vec<String>,
}

impl FileSet {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            includes: Vec::new(),
        }
    }

    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.includes.push(pattern.into());
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    /// Whether a path relative to the root is selected.
    pub fn matches(&self, relative: &Path) -> bool {
        let segments: Vec<String> = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                _ => None,
            })
            .collect();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
        self.includes
            .iter()
            .any(|p| match_path(&pattern_segments(p), &segments))
    }

    /// Walk the root and return every selected regular file, sorted.
    /// Symlinked directories are not entered. A missing root selects nothing.
    pub fn scan(&self) -> io::Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        if !self.root.is_dir() {
            return Ok(found);
        }
        self.walk(&self.root, &mut found)?;
        found.sort();
        Ok(found)
    }

    fn walk(&self, dir: &Path, found: &mut Vec<PathBuf>) -> io::Result<()> {
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type()?;
            let is_file = if file_type.is_dir() {
                self.walk(&path, found)?;
                continue;
            } else if file_type.is_symlink() {
                fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false)
            } else {
                file_type.is_file()
            };
            if !is_file {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(&self.root) {
                if self.matches(relative) {
                    found.push(path);
                }
            }
        }
        Ok(())
    }
}

fn pattern_segments(pattern: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    if pattern.ends_with('/') {
        segments.push("**");
    }
    segments
}

fn match_path(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((&"**", rest)) => (0..=path.len()).any(|i| match_path(rest, &path[i..])),
        Some((seg, rest)) => match path.split_first() {
            Some((name, path_rest)) => {
                let p: Vec<char> = seg.chars().collect();
                let n: Vec<char> = name.chars().collect();
                match_component(&p, &n) && match_path(rest, path_rest)
            }
            None => false,
        },
    }
}

fn match_component(pattern: &[char], name: &[char]) -> bool {
    match pattern.split_first() {
        None => name.is_empty(),
        Some(('*', rest)) => (0..=name.len()).any(|i| match_component(rest, &name[i..])),
        Some(('?', rest)) => !name.is_empty() && match_component(rest, &name[1..]),
        Some((c, rest)) => name.first() == Some(c) && match_component(rest, &name[1..]),
    }
}
