// ─── manifestgen core ───
// Deployment manifest generation with a per-OS platform artifact cache.
//
// Architecture:
//   core/
//     platform/   — OS tags + platform artifact filename convention
//     maven/      — Artifact coordinates -> repository URLs
//     downloader/ — Timed, retried, checksum-verified atomic downloads
//     cache/      — Idempotent OS-qualified artifact cache
//     manifest/   — Manifest model, builder, XML document
//     tier/       — Business/bootstrap layout + orchestration
//     config      — Immutable run configuration

pub mod cache;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod manifest;
pub mod maven;
pub mod platform;
pub mod tier;
