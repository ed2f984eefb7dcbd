mod builder;
mod model;
pub mod xml;

pub use builder::build;
pub use model::{FileDecl, FileRecord, LiteralFile, Manifest, ManifestSpec};
pub use xml::{read_manifest, ManifestWriter, XmlManifestWriter};
