// ─── Platform Artifact Filenames ───
// Naming convention: `<prefix>-<module>-<version>[-<os>].jar`

use serde::{Deserialize, Serialize};

use super::OsTag;
use crate::core::error::GeneratorResult;
use crate::core::maven::ArtifactCoordinate;

const EXTENSION: &str = ".jar";

/// A family of OS-qualified artifacts sharing a filename prefix and group id,
/// e.g. `javafx-*.jar` published under `org.openjfx`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlatformFamily {
    pub prefix: String,
    pub group: String,
}

impl Default for PlatformFamily {
    fn default() -> Self {
        Self {
            prefix: "javafx".to_string(),
            group: "org.openjfx".to_string(),
        }
    }
}

/// Components recovered from a platform artifact filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedArtifact {
    pub prefix: String,
    pub module: String,
    pub version: String,
    pub os: Option<OsTag>,
}

impl PlatformFamily {
    /// Whether a filename belongs to this family at all (cheap prefix check).
    pub fn claims(&self, filename: &str) -> bool {
        filename.starts_with(&self.prefix)
    }

    /// Parse a filename. Returns `None` for anything off-convention.
    pub fn parse(&self, filename: &str) -> Option<ParsedArtifact> {
        let stem = filename.strip_suffix(EXTENSION)?;
        let rest = stem.strip_prefix(self.prefix.as_str())?.strip_prefix('-')?;
        let mut parts = rest.split('-');

        let module = parts
            .next()
            .filter(|m| !m.is_empty() && m.bytes().all(|b| b.is_ascii_lowercase()))?;
        let version = parts.next().filter(|v| {
            v.bytes().any(|b| b.is_ascii_digit()) && v.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        })?;
        let os = match parts.next() {
            Some(suffix) => Some(OsTag::from_short_name(suffix)?),
            None => None,
        };
        if parts.next().is_some() {
            return None;
        }

        Some(ParsedArtifact {
            prefix: self.prefix.clone(),
            module: module.to_string(),
            version: version.to_string(),
            os,
        })
    }

    /// Repository coordinate for a parsed artifact (`javafx` + `base` -> `javafx.base`).
    pub fn coordinate(&self, parsed: &ParsedArtifact) -> GeneratorResult<ArtifactCoordinate> {
        ArtifactCoordinate::new(
            self.group.as_str(),
            format!("{}.{}", parsed.prefix, parsed.module),
            parsed.version.as_str(),
            parsed.os,
        )
    }
}

impl ParsedArtifact {
    /// Caller-supplied OS wins over whatever the filename carried.
    pub fn with_os_fallback(mut self, os: Option<OsTag>) -> Self {
        if os.is_some() {
            self.os = os;
        }
        self
    }

    /// Filename of the variant for `os`, replacing any existing suffix.
    pub fn file_name_for(&self, os: OsTag) -> String {
        format!(
            "{}-{}-{}-{}{}",
            self.prefix,
            self.module,
            self.version,
            os.short_name(),
            EXTENSION
        )
    }
}
