use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::maven::MAVEN_CENTRAL;
use crate::core::tier::ProjectLayout;

const APP_DIR_NAME: &str = "manifestgen";

/// Network behaviour of the artifact downloader.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Whole-request timeout; expiry counts as a fetch failure.
    pub timeout: Duration,
    /// Additional attempts after a transient failure.
    pub retries: u32,
    /// Delay before the first retry, doubled on each subsequent one.
    pub retry_backoff: Duration,
    /// Maximum number of parallel downloads.
    pub concurrency: usize,
    /// Verify bodies against the repository's `.sha1` sidecar when published.
    pub verify_checksums: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            retries: 2,
            retry_backoff: Duration::from_millis(500),
            concurrency: 4,
            verify_checksums: true,
        }
    }
}

/// Everything a run needs, resolved once at startup and passed down by reference.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Where the business and bootstrap manifests are written.
    pub config_dir: PathBuf,
    /// OS-qualified platform artifacts, persisted across runs.
    pub cache_dir: PathBuf,
    /// Platform artifacts whose names select the modules to cache.
    pub seed_dir: PathBuf,
    /// Remote repository base URL.
    pub repository: String,
    pub fetch: FetchSettings,
    pub layout: ProjectLayout,
}

impl GeneratorConfig {
    pub fn new(config_dir: PathBuf, cache_dir: PathBuf, seed_dir: PathBuf) -> Self {
        Self {
            config_dir,
            cache_dir,
            seed_dir,
            repository: MAVEN_CENTRAL.to_string(),
            fetch: FetchSettings::default(),
            layout: ProjectLayout::default(),
        }
    }

    /// `<config-dir>/business`, source of the business tier's files.
    pub fn business_dir(&self) -> PathBuf {
        self.config_dir.join("business")
    }

    /// `<config-dir>/bootstrap`, source of the launcher jar.
    pub fn bootstrap_dir(&self) -> PathBuf {
        self.config_dir.join("bootstrap")
    }

    pub fn business_output(&self) -> PathBuf {
        self.business_dir().join(&self.layout.business.output)
    }

    pub fn bootstrap_output(&self) -> PathBuf {
        self.config_dir.join(&self.layout.bootstrap.output)
    }
}

/// Default cache location under the user's cache directory.
pub fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
        .join("fxcache")
}

/// Relative paths are interpreted against the working directory at startup.
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
