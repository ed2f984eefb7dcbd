use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::core::config::{absolutize, default_cache_dir, FetchSettings, GeneratorConfig};
use crate::core::error::GeneratorResult;
use crate::core::maven::MAVEN_CENTRAL;
use crate::core::tier::ProjectLayout;

/// Generate the business and bootstrap update manifests.
///
/// Platform artifacts named in the seed directory are cached once per target
/// OS and listed in the bootstrap manifest.
#[derive(Parser, Debug)]
#[command(name = "manifestgen", version, about)]
pub struct Cli {
    /// Output directory; business inputs are read from `<dir>/business`,
    /// the launcher from `<dir>/bootstrap`.
    #[arg(long, env = "MANIFESTGEN_CONFIG_DIR", default_value = "config")]
    pub config_dir: PathBuf,

    /// Persistent cache of OS-qualified platform artifacts.
    #[arg(long, env = "MANIFESTGEN_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Directory whose platform artifact names select what gets cached.
    #[arg(long, env = "MANIFESTGEN_SEED_DIR", default_value = "target/javafx")]
    pub seed_dir: PathBuf,

    /// Remote repository base URL.
    #[arg(long, env = "MANIFESTGEN_REPOSITORY", default_value = MAVEN_CENTRAL)]
    pub repository: String,

    /// JSON file replacing the built-in project layout.
    #[arg(long, env = "MANIFESTGEN_LAYOUT")]
    pub layout: Option<PathBuf>,

    /// Parallel downloads.
    #[arg(long, env = "MANIFESTGEN_CONCURRENCY", default_value_t = 4)]
    pub concurrency: usize,

    /// Per-request timeout in seconds.
    #[arg(long, env = "MANIFESTGEN_TIMEOUT_SECS", default_value_t = 60)]
    pub timeout_secs: u64,

    /// Extra attempts after a transient download failure.
    #[arg(long, env = "MANIFESTGEN_RETRIES", default_value_t = 2)]
    pub retries: u32,

    /// Skip verification against the repository's `.sha1` files.
    #[arg(long)]
    pub no_verify_checksums: bool,
}

impl Cli {
    /// Resolve into the immutable run configuration.
    pub fn into_config(self) -> GeneratorResult<GeneratorConfig> {
        let layout = match &self.layout {
            Some(path) => ProjectLayout::load(path)?,
            None => ProjectLayout::default(),
        };

        let cache_dir = self.cache_dir.unwrap_or_else(default_cache_dir);

        let mut config = GeneratorConfig::new(
            absolutize(&self.config_dir),
            absolutize(&cache_dir),
            absolutize(&self.seed_dir),
        );
        config.repository = self.repository;
        config.layout = layout;
        config.fetch = FetchSettings {
            timeout: Duration::from_secs(self.timeout_secs),
            retries: self.retries,
            concurrency: self.concurrency.max(1),
            verify_checksums: !self.no_verify_checksums,
            ..FetchSettings::default()
        };

        Ok(config)
    }
}
