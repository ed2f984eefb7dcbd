pub mod cli;
pub mod core;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::core::downloader::Downloader;
use crate::core::manifest::XmlManifestWriter;
use crate::core::tier::{generate, GenerationReport};

pub fn run() -> ExitCode {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,manifestgen_lib=debug")),
        )
        .init();

    let cli = Cli::parse();

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(execute(cli)) {
        Ok(report) => {
            info!(
                "Done: {:?} ({} files), {:?} ({} files), {} platform artifacts downloaded",
                report.business_manifest,
                report.business_files,
                report.bootstrap_manifest,
                report.bootstrap_files,
                report.downloaded()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> anyhow::Result<GenerationReport> {
    let config = cli.into_config().context("invalid configuration")?;
    info!(
        "Generating manifests in {:?} (cache {:?}, seeds {:?})",
        config.config_dir, config.cache_dir, config.seed_dir
    );

    let downloader =
        Downloader::new(config.fetch.clone()).context("failed to build HTTP client")?;

    generate(&config, &downloader, &XmlManifestWriter)
        .await
        .context("manifest generation failed")
}
