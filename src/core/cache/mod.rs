mod artifact_cache;

pub(crate) use artifact_cache::list_file_names;
pub use artifact_cache::{ArtifactCache, CacheEntry};
