use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::core::platform::{OsTag, PlatformFamily};

/// One entry of a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Location relative to the manifest's base path, `/`-separated.
    pub path: String,
    /// Explicit origin. `None` resolves against the manifest's base URI.
    pub uri: Option<String>,
    pub size: u64,
    /// Adler-32 of the file contents, lowercase hex.
    pub checksum: String,
    pub os: Option<OsTag>,
    pub classpath: bool,
    /// Set for platform modules that collide with ones bundled in some runtimes.
    pub ignore_boot_conflict: bool,
}

/// An immutable, fully built manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    pub timestamp: DateTime<Utc>,
    pub base_uri: String,
    pub base_path: String,
    pub files: Vec<FileRecord>,
    pub properties: BTreeMap<String, String>,
}

impl Manifest {
    pub fn find(&self, path: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.path == path)
    }
}

// ─── Declarations ───

/// Input to the builder: everything a manifest consists of, in order.
#[derive(Debug, Clone, Default)]
pub struct ManifestSpec {
    pub base_uri: String,
    pub base_path: String,
    pub files: Vec<FileDecl>,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub enum FileDecl {
    /// A single file read from `source`.
    Literal(LiteralFile),
    /// Every family member found directly inside `dir`.
    DirectoryScan {
        dir: PathBuf,
        family: PlatformFamily,
        /// Repository the scanned artifacts are published in.
        repository: String,
    },
}

#[derive(Debug, Clone)]
pub struct LiteralFile {
    /// On-disk file whose size and checksum are recorded.
    pub source: PathBuf,
    /// Manifest path; defaults to the source's file name.
    pub path: Option<String>,
    pub uri: Option<String>,
    pub classpath: bool,
    pub os: Option<OsTag>,
    pub ignore_boot_conflict: bool,
}

impl LiteralFile {
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            path: None,
            uri: None,
            classpath: false,
            os: None,
            ignore_boot_conflict: false,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.uri = Some(uri.into());
        self
    }

    pub fn on_classpath(mut self) -> Self {
        self.classpath = true;
        self
    }
}

impl From<LiteralFile> for FileDecl {
    fn from(file: LiteralFile) -> Self {
        FileDecl::Literal(file)
    }
}
