use std::path::PathBuf;
use thiserror::Error;

use crate::core::platform::OsTag;

/// Central error type for the generator.
/// Every module returns `Result<T, GeneratorError>`.
#[derive(Debug, Error)]
pub enum GeneratorError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Cache write failed at {path:?}: {source}")]
    CacheWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Network ─────────────────────────────────────────
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Fetch failed for {artifact} ({os}) from {url}: {reason}")]
    FetchFailure {
        artifact: String,
        os: OsTag,
        url: String,
        reason: String,
    },

    #[error("{count} platform artifact download(s) failed, first: {first}")]
    IncompleteCache {
        count: usize,
        first: Box<GeneratorError>,
    },

    // ── Integrity ───────────────────────────────────────
    #[error("SHA-1 mismatch for {url}: expected {expected}, got {actual}")]
    Sha1Mismatch {
        url: String,
        expected: String,
        actual: String,
    },

    // ── Coordinates ─────────────────────────────────────
    #[error("Invalid artifact coordinate: {0}")]
    InvalidCoordinate(String),

    // ── Manifest ────────────────────────────────────────
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    #[error("Manifest serialization failed: {0}")]
    Serialization(String),

    // ── Layout ──────────────────────────────────────────
    #[error("Layout file error: {0}")]
    Layout(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

impl GeneratorError {
    /// Whether a failed fetch is worth another attempt.
    ///
    /// Integrity failures are deterministic, so only transport errors and
    /// non-success statuses qualify.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GeneratorError::Http(_) | GeneratorError::DownloadFailed { .. }
        )
    }
}

impl From<std::io::Error> for GeneratorError {
    fn from(source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}

impl From<quick_xml::SeError> for GeneratorError {
    fn from(e: quick_xml::SeError) -> Self {
        GeneratorError::Serialization(e.to_string())
    }
}

impl From<quick_xml::DeError> for GeneratorError {
    fn from(e: quick_xml::DeError) -> Self {
        GeneratorError::Serialization(e.to_string())
    }
}
