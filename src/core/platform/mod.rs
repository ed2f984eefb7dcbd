mod filename;
mod os;

pub use filename::{ParsedArtifact, PlatformFamily};
pub use os::OsTag;
