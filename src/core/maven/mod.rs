mod artifact;

pub use artifact::ArtifactCoordinate;

/// Default remote repository.
pub const MAVEN_CENTRAL: &str = "https://repo1.maven.org/maven2";
