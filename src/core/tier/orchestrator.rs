// ─── Tier Orchestrator ───
// business manifest -> disk -> platform cache -> bootstrap manifest -> disk

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use tracing::info;

use crate::core::cache::{ArtifactCache, CacheEntry};
use crate::core::config::GeneratorConfig;
use crate::core::downloader::ArtifactFetcher;
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::manifest::{self, FileDecl, LiteralFile, ManifestSpec, ManifestWriter};
use crate::core::maven::ArtifactCoordinate;
use crate::core::platform::OsTag;

/// Outcome of a full generation run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub business_manifest: PathBuf,
    pub business_files: usize,
    pub bootstrap_manifest: PathBuf,
    pub bootstrap_files: usize,
    pub cache_entries: Vec<CacheEntry>,
}

impl GenerationReport {
    pub fn downloaded(&self) -> usize {
        self.cache_entries.iter().filter(|e| e.downloaded).count()
    }
}

/// Declarations of the business tier.
pub fn business_spec(config: &GeneratorConfig) -> GeneratorResult<ManifestSpec> {
    let tier = &config.layout.business;
    let dir = config.business_dir();

    let mut files: Vec<FileDecl> = vec![LiteralFile::new(dir.join(&tier.application_jar))
        .with_path(tier.application_jar.as_str())
        .on_classpath()
        .into()];

    for lib in &tier.libraries {
        let uri = ArtifactCoordinate::parse(&lib.coordinate)?.resolve(&config.repository)?;
        files.push(
            LiteralFile::new(dir.join(&lib.file))
                .with_uri(uri)
                .on_classpath()
                .into(),
        );
    }

    Ok(ManifestSpec {
        base_uri: tier.base_uri.clone(),
        base_path: tier.base_path.clone(),
        files,
        properties: BTreeMap::from([("maven.central".to_string(), config.repository.clone())]),
    })
}

/// Declarations of the bootstrap tier. Its first file is the business
/// manifest itself, so a launcher without network access can fall back to
/// the copy on disk.
pub fn bootstrap_spec(config: &GeneratorConfig) -> ManifestSpec {
    let business = &config.layout.business;
    let tier = &config.layout.bootstrap;

    let fallback = LiteralFile::new(config.business_output())
        .with_path(format!("../business/{}", business.output))
        .with_uri(business.manifest_uri());

    let launcher = LiteralFile::new(config.bootstrap_dir().join(&tier.launcher_jar))
        .with_uri(tier.launcher_uri.as_str())
        .on_classpath();

    let platform_scan = FileDecl::DirectoryScan {
        dir: config.cache_dir.clone(),
        family: tier.platform.clone(),
        repository: config.repository.clone(),
    };

    let platform_root = format!(
        "${{maven.central}}/{}/",
        tier.platform.group.replace('.', "/")
    );

    ManifestSpec {
        base_uri: tier.base_uri.clone(),
        base_path: tier.base_path.clone(),
        files: vec![fallback.into(), launcher.into(), platform_scan],
        properties: BTreeMap::from([
            ("default.launcher.main.class".to_string(), tier.main_class.clone()),
            ("maven.central".to_string(), config.repository.clone()),
            ("maven.central.javafx".to_string(), platform_root),
        ]),
    }
}

/// Produce both manifests.
///
/// The business manifest is on disk before the bootstrap tier is built, and
/// the platform cache is complete before it is scanned. Nothing is written
/// for a tier whose build failed.
pub async fn generate(
    config: &GeneratorConfig,
    fetcher: &dyn ArtifactFetcher,
    writer: &dyn ManifestWriter,
) -> GeneratorResult<GenerationReport> {
    // 1–2. Business tier
    let business = manifest::build(&business_spec(config)?).await?;
    let business_manifest = config.business_output();
    writer.write(&business, &business_manifest)?;
    info!(
        "Business tier: {} files -> {:?}",
        business.files.len(),
        business_manifest
    );

    // 3. Platform cache
    let cache = ArtifactCache::new(
        config.cache_dir.clone(),
        config.repository.clone(),
        config.layout.bootstrap.platform.clone(),
        config.fetch.concurrency,
    );
    let targets: BTreeSet<OsTag> = OsTag::ALL.into_iter().collect();
    let cache_entries = cache
        .ensure_cached(&config.seed_dir, &targets, fetcher)
        .await?;

    // 4–5. Bootstrap tier
    if !business_manifest.is_file() {
        return Err(GeneratorError::InvalidManifest(format!(
            "business manifest {:?} missing before bootstrap build",
            business_manifest
        )));
    }
    let bootstrap = manifest::build(&bootstrap_spec(config)).await?;
    let bootstrap_manifest = config.bootstrap_output();
    writer.write(&bootstrap, &bootstrap_manifest)?;
    info!(
        "Bootstrap tier: {} files -> {:?}",
        bootstrap.files.len(),
        bootstrap_manifest
    );

    Ok(GenerationReport {
        business_manifest,
        business_files: business.files.len(),
        bootstrap_manifest,
        bootstrap_files: bootstrap.files.len(),
        cache_entries,
    })
}
