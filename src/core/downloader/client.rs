use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};
use sha1::{Digest, Sha1};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::core::config::FetchSettings;
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::http::build_http_client;

/// Something that can place the resource at `url` on disk at `dest`.
///
/// Implementations must never leave a partial file at `dest`.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    async fn fetch_to(&self, url: &str, dest: &Path) -> GeneratorResult<()>;
}

/// HTTP downloader with retries, repository SHA-1 checks and atomic writes.
pub struct Downloader {
    client: Client,
    settings: FetchSettings,
}

impl Downloader {
    pub fn new(settings: FetchSettings) -> GeneratorResult<Self> {
        let client = build_http_client(settings.timeout)?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    // ── Single attempt ──────────────────────────────────

    /// Download `url` into `dest` once.
    ///
    /// The body is streamed into a uniquely named sibling file which is only
    /// renamed onto `dest` after the body completed and, when the repository
    /// publishes one, its SHA-1 matched.
    pub async fn download_file(&self, url: &str, dest: &Path) -> GeneratorResult<()> {
        let expected_sha1 = if self.settings.verify_checksums {
            self.fetch_published_sha1(url).await?
        } else {
            None
        };

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(GeneratorError::DownloadFailed {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let part = part_path(dest);
        if let Err(e) = write_atomically(response, &part, dest, url, expected_sha1).await {
            let _ = tokio::fs::remove_file(&part).await;
            return Err(e);
        }

        debug!("Downloaded: {} -> {:?}", url, dest);
        Ok(())
    }

    /// Read `<url>.sha1`. A 404 means the repository publishes no checksum.
    async fn fetch_published_sha1(&self, url: &str) -> GeneratorResult<Option<String>> {
        let sidecar = format!("{url}.sha1");
        let response = self.client.get(&sidecar).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("No checksum published at {}", sidecar);
            return Ok(None);
        }
        if !status.is_success() {
            return Err(GeneratorError::DownloadFailed {
                url: sidecar,
                status: status.as_u16(),
            });
        }

        // Some repositories append the file name after the digest.
        let body = response.text().await?;
        Ok(body
            .split_whitespace()
            .next()
            .map(|digest| digest.to_ascii_lowercase()))
    }
}

#[async_trait]
impl ArtifactFetcher for Downloader {
    async fn fetch_to(&self, url: &str, dest: &Path) -> GeneratorResult<()> {
        let mut attempt: u32 = 0;
        loop {
            match self.download_file(url, dest).await {
                Ok(()) => return Ok(()),
                Err(e) if e.is_transient() && attempt < self.settings.retries => {
                    let delay = self
                        .settings
                        .retry_backoff
                        .saturating_mul(2u32.saturating_pow(attempt));
                    attempt += 1;
                    warn!(
                        "Attempt {}/{} for {} failed: {} (retrying in {:?})",
                        attempt,
                        self.settings.retries + 1,
                        url,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Stream `response` into `part`, check the digest, then move it onto `dest`.
async fn write_atomically(
    response: Response,
    part: &Path,
    dest: &Path,
    url: &str,
    expected_sha1: Option<String>,
) -> GeneratorResult<()> {
    let write_err = |source| GeneratorError::CacheWrite {
        path: part.to_path_buf(),
        source,
    };

    let mut file = tokio::fs::File::create(part).await.map_err(write_err)?;
    let mut hasher = Sha1::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        hasher.update(&chunk);
        file.write_all(&chunk).await.map_err(write_err)?;
    }
    file.flush().await.map_err(write_err)?;
    // handle must be closed before the rename on Windows
    drop(file);

    if let Some(expected) = expected_sha1 {
        let actual = hex::encode(hasher.finalize());
        if !actual.eq_ignore_ascii_case(&expected) {
            return Err(GeneratorError::Sha1Mismatch {
                url: url.to_string(),
                expected,
                actual,
            });
        }
    }

    tokio::fs::rename(part, dest)
        .await
        .map_err(|source| GeneratorError::CacheWrite {
            path: dest.to_path_buf(),
            source,
        })
}

/// Temporary sibling of `dest`, unique per download attempt.
fn part_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.{}.part", name, Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_files_are_hidden_siblings() {
        let dest = Path::new("/cache/javafx-base-17-win.jar");
        let part = part_path(dest);
        assert_eq!(part.parent(), dest.parent());
        let name = part.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(".javafx-base-17-win.jar."));
        assert!(name.ends_with(".part"));
        assert_ne!(part_path(dest), part);
    }
}
