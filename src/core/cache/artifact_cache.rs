// ─── Platform Artifact Cache ───
// Keeps one OS-qualified copy of every seed artifact in a persistent directory.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::core::downloader::ArtifactFetcher;
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::maven::ArtifactCoordinate;
use crate::core::platform::{OsTag, PlatformFamily};

/// A cached OS-qualified artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub path: PathBuf,
    pub coordinate: ArtifactCoordinate,
    pub os: OsTag,
    /// `true` when this run fetched it, `false` when it was already present.
    pub downloaded: bool,
}

impl CacheEntry {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// A missing (artifact, OS) pair and where it comes from.
struct PendingFetch {
    entry: CacheEntry,
    url: String,
}

pub struct ArtifactCache {
    dir: PathBuf,
    repository: String,
    family: PlatformFamily,
    concurrency: usize,
}

impl ArtifactCache {
    pub fn new(
        dir: impl Into<PathBuf>,
        repository: impl Into<String>,
        family: PlatformFamily,
        concurrency: usize,
    ) -> Self {
        Self {
            dir: dir.into(),
            repository: repository.into(),
            family,
            concurrency: concurrency.max(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Make sure every parseable artifact in `seed_dir` exists in the cache
    /// once per target OS, downloading only what is missing.
    ///
    /// Already-present files are never fetched again. Every missing pair is
    /// attempted; if any failed, the first failure is returned together with
    /// the failure count, while the successful downloads stay cached.
    pub async fn ensure_cached(
        &self,
        seed_dir: &Path,
        targets: &BTreeSet<OsTag>,
        fetcher: &dyn ArtifactFetcher,
    ) -> GeneratorResult<Vec<CacheEntry>> {
        // Created once, before any download starts.
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| GeneratorError::CacheWrite {
                path: self.dir.clone(),
                source,
            })?;

        let (mut entries, pending) = self.plan(seed_dir, targets).await?;

        info!(
            "Caching platform artifacts in {:?}: {} to download, {} already cached",
            self.dir,
            pending.len(),
            entries.len()
        );

        let results: Vec<_> = stream::iter(pending)
            .map(|job| async move {
                let outcome = fetcher.fetch_to(&job.url, &job.entry.path).await;
                (job, outcome)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut failures = Vec::new();
        for (job, outcome) in results {
            match outcome {
                Ok(()) => entries.push(job.entry),
                Err(e) => {
                    let err = classify_failure(&job, e);
                    warn!("{}", err);
                    failures.push(err);
                }
            }
        }

        if !failures.is_empty() {
            let count = failures.len();
            let first = failures.swap_remove(0);
            return Err(GeneratorError::IncompleteCache {
                count,
                first: Box::new(first),
            });
        }

        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    /// List and parse the seed directory, splitting target files into those
    /// already cached and those that need a fetch.
    async fn plan(
        &self,
        seed_dir: &Path,
        targets: &BTreeSet<OsTag>,
    ) -> GeneratorResult<(Vec<CacheEntry>, Vec<PendingFetch>)> {
        // Keyed by cache file name: two seeds may map to the same variant.
        let mut wanted: BTreeMap<String, (ArtifactCoordinate, OsTag)> = BTreeMap::new();

        for name in list_file_names(seed_dir).await? {
            let Some(parsed) = self.family.parse(&name) else {
                debug!("Skipping non-artifact seed file: {}", name);
                continue;
            };

            for &os in targets {
                let coordinate = self.family.coordinate(&parsed)?.with_os(os);
                wanted
                    .entry(parsed.file_name_for(os))
                    .or_insert((coordinate, os));
            }
        }

        let mut present = Vec::new();
        let mut pending = Vec::new();

        for (file_name, (coordinate, os)) in wanted {
            let path = self.dir.join(&file_name);
            if path.exists() {
                present.push(CacheEntry {
                    path,
                    coordinate,
                    os,
                    downloaded: false,
                });
                continue;
            }

            let url = coordinate.resolve(&self.repository)?;
            pending.push(PendingFetch {
                entry: CacheEntry {
                    path,
                    coordinate,
                    os,
                    downloaded: true,
                },
                url,
            });
        }

        Ok((present, pending))
    }
}

/// Regular files directly inside `dir`, sorted by name.
pub(crate) async fn list_file_names(dir: &Path) -> GeneratorResult<Vec<String>> {
    let io_err = |source| GeneratorError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut reader = tokio::fs::read_dir(dir).await.map_err(io_err)?;
    let mut names = Vec::new();

    while let Some(entry) = reader.next_entry().await.map_err(io_err)? {
        let file_type = entry.file_type().await.map_err(io_err)?;
        if file_type.is_file() {
            names.push(entry.file_name().to_string_lossy().to_string());
        }
    }

    names.sort();
    Ok(names)
}

fn classify_failure(job: &PendingFetch, error: GeneratorError) -> GeneratorError {
    if matches!(error, GeneratorError::CacheWrite { .. }) {
        return error;
    }
    GeneratorError::FetchFailure {
        artifact: job.entry.coordinate.to_string(),
        os: job.entry.os,
        url: job.url.clone(),
        reason: error.to_string(),
    }
}
