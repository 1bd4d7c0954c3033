//! Maven coordinates in Gradle notation: `group:artifact:version[:classifier][@extension]`.

use std::fmt;

const DEFAULT_EXTENSION: &str = "jar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MavenCoordinate {
    pub group: String,
    pub artifact: String,
    pub version: String,
    pub classifier: Option<String>,
    pub extension: String,
}

fn valid_part(s: &str) -> bool {
    !s.is_empty() && !s.contains(['/', '\\']) && !s.chars().any(char::is_whitespace)
}

impl MavenCoordinate {
    /// Returns `None` unless there are three or four non-empty `:` parts.
    pub fn parse(s: &str) -> Option<Self> {
        let (coords, extension) = match s.rsplit_once('@') {
            Some((c, ext)) => (c, ext),
            None => (s, DEFAULT_EXTENSION),
        };
        if !valid_part(extension) {
            return None;
        }
        let parts: Vec<&str> = coords.split(':').collect();
        if !(3..=4).contains(&parts.len()) || !parts.iter().all(|p| valid_part(p)) {
            return None;
        }
        Some(Self {
            group: parts[0].to_string(),
            artifact: parts[1].to_string(),
            version: parts[2].to_string(),
            classifier: parts.get(3).map(|c| c.to_string()),
            extension: extension.to_string(),
        })
    }

    /// `artifact-version[-classifier].extension`
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(c) => format!("{}-{}-{}.{}", self.artifact, self.version, c, self.extension),
            None => format!("{}-{}.{}", self.artifact, self.version, self.extension),
        }
    }

    /// Path below a Maven repository root.
    pub fn repository_path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.group.replace('.', "/"),
            self.artifact,
            self.version,
            self.file_name()
        )
    }
}

impl fmt::Display for MavenCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.version)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{}", c)?;
        }
        if self.extension != DEFAULT_EXTENSION {
            write!(f, "@{}", self.extension)?;
        }
        Ok(())
    }
}
