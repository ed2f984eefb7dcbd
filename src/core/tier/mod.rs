mod layout;
mod orchestrator;

pub use layout::{BootstrapTier, BusinessTier, LibraryDecl, ProjectLayout};
pub use orchestrator::{bootstrap_spec, business_spec, generate, GenerationReport};
