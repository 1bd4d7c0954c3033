//! Parse manifest text into entries.

use super::{ExpectedHash, ManifestEntry, MavenCoordinate, Resource};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("line {line}: expected `<hash> <resource>`, got {text:?}")]
    MissingResource { line: usize, text: String },
    #[error("line {line}: {hash:?} is not a SHA-1 or SHA-256 hex digest")]
    BadHash { line: usize, hash: String },
    #[error("line {line}: invalid Maven coordinate {text:?}")]
    BadCoordinate { line: usize, text: String },
    #[error("line {line}: file name {name:?} must be a single path component")]
    BadFileName { line: usize, name: String },
    #[error("line {line}: unexpected trailing text {text:?}")]
    TrailingText { line: usize, text: String },
}

fn parse_file_name(line: usize, name: &str) -> Result<Resource, ManifestError> {
    if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        return Err(ManifestError::BadFileName {
            line,
            name: name.to_string(),
        });
    }
    Ok(Resource::File(name.to_string()))
}

fn parse_line(line: usize, text: &str) -> Result<ManifestEntry, ManifestError> {
    let mut tokens = text.split_whitespace();
    let (hash, resource) = match (tokens.next(), tokens.next()) {
        (Some(h), Some(r)) => (h, r),
        _ => {
            return Err(ManifestError::MissingResource {
                line,
                text: text.to_string(),
            })
        }
    };
    let rest: Vec<&str> = tokens.collect();
    if !rest.is_empty() {
        return Err(ManifestError::TrailingText {
            line,
            text: rest.join(" "),
        });
    }

    let hash = ExpectedHash::parse(hash).ok_or_else(|| ManifestError::BadHash {
        line,
        hash: hash.to_string(),
    })?;

    // Plain file names never contain ':'.
    let resource = if resource.contains(':') {
        MavenCoordinate::parse(resource)
            .map(Resource::Maven)
            .ok_or_else(|| ManifestError::BadCoordinate {
                line,
                text: resource.to_string(),
            })?
    } else {
        parse_file_name(line, resource)?
    };

    Ok(ManifestEntry {
        hash,
        resource,
        line,
    })
}

/// Parse a whole manifest. Blank lines and `#` comments are skipped; the
/// first malformed line aborts with its line number.
pub fn parse_manifest(text: &str) -> Result<Vec<ManifestEntry>, ManifestError> {
    let mut entries = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        entries.push(parse_line(i + 1, trimmed)?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHA: &str = "F51DC0E3C8D81FA2D7F31F8E9C1D0A8E9C2A5B7D";

    #[test]
    fn skips_comments_and_blank_lines() {
        let text = format!(
            "# Licensed to the Apache Software Foundation\n\n   \n{} jsch-0.1.55.jar\n",
            SHA
        );
        let entries = parse_manifest(&text).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].line, 4);
        assert_eq!(entries[0].resource, Resource::File("jsch-0.1.55.jar".into()));
        assert_eq!(entries[0].hash.as_hex(), SHA);
    }

    #[test]
    fn maven_and_plain_entries() {
        let text = format!(
            "{sha} com.google.code.gson:gson:2.8.9\n{lower} nb-javac-17-api.jar\n",
            sha = SHA,
            lower = SHA.to_ascii_lowercase()
        );
        let entries = parse_manifest(&text).unwrap();
        assert_eq!(entries.len(), 2);
        match &entries[0].resource {
            Resource::Maven(c) => assert_eq!(c.file_name(), "gson-2.8.9.jar"),
            other => panic!("expected maven, got {:?}", other),
        }
        assert_eq!(entries[1].hash.as_hex(), SHA);
    }

    #[test]
    fn empty_manifest_has_no_entries() {
        assert!(parse_manifest("").unwrap().is_empty());
        assert!(parse_manifest("# only a comment\n").unwrap().is_empty());
    }

    #[test]
    fn reports_line_of_first_error() {
        let text = format!("{} ok.jar\n{}\n", SHA, SHA);
        assert_eq!(
            parse_manifest(&text).unwrap_err(),
            ManifestError::MissingResource {
                line: 2,
                text: SHA.to_string()
            }
        );
    }

    #[test]
    fn rejects_bad_hash_and_names() {
        assert!(matches!(
            parse_manifest("XYZ foo.jar").unwrap_err(),
            ManifestError::BadHash { line: 1, .. }
        ));
        assert!(matches!(
            parse_manifest(&format!("{} ../escape.jar", SHA)).unwrap_err(),
            ManifestError::BadFileName { line: 1, .. }
        ));
        assert!(matches!(
            parse_manifest(&format!("{} a:b", SHA)).unwrap_err(),
            ManifestError::BadCoordinate { line: 1, .. }
        ));
        assert!(matches!(
            parse_manifest(&format!("{} foo.jar extra", SHA)).unwrap_err(),
            ManifestError::TrailingText { line: 1, .. }
        ));
    }
}
