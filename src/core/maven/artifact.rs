use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::platform::OsTag;

/// Identity of a remote artifact, optionally qualified by operating system.
///
/// Supported notation:
///   `group:name:version`
///   `group:name:version:os`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ArtifactCoordinate {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub os: Option<OsTag>,
}

impl ArtifactCoordinate {
    /// Build a coordinate, rejecting empty components.
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
        os: Option<OsTag>,
    ) -> GeneratorResult<Self> {
        let coord = Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            os,
        };
        coord.validate()?;
        Ok(coord)
    }

    /// Parse the colon notation.
    ///
    /// # Examples
    /// ```
    /// use manifestgen_lib::core::maven::ArtifactCoordinate;
    /// let a = ArtifactCoordinate::parse("org.controlsfx:controlsfx:9.0.0").unwrap();
    /// assert_eq!(a.group, "org.controlsfx");
    /// ```
    pub fn parse(coord: &str) -> GeneratorResult<Self> {
        let parts: Vec<&str> = coord.split(':').collect();

        match parts.as_slice() {
            [group, name, version] => Self::new(*group, *name, *version, None),
            [group, name, version, os] => Self::new(*group, *name, *version, Some(os.parse()?)),
            _ => Err(GeneratorError::InvalidCoordinate(coord.to_string())),
        }
    }

    /// Same artifact, qualified for a specific operating system.
    pub fn with_os(&self, os: OsTag) -> Self {
        Self {
            os: Some(os),
            ..self.clone()
        }
    }

    /// Group path portion (`org/openjfx`).
    pub fn group_path(&self) -> String {
        self.group.replace('.', "/")
    }

    /// Artifact id as it appears in repository paths (`javafx.base` -> `javafx-base`).
    pub fn artifact_path(&self) -> String {
        self.name.replace('.', "-")
    }

    /// `artifact-version[-os].jar`
    pub fn filename(&self) -> String {
        match self.os {
            Some(os) => format!(
                "{}-{}-{}.jar",
                self.artifact_path(),
                self.version,
                os.short_name()
            ),
            None => format!("{}-{}.jar", self.artifact_path(), self.version),
        }
    }

    /// Canonical URL under the given repository base.
    ///
    /// Template:
    /// `<repo>/<group_path>/<artifact_path>/<version>/<filename>`
    pub fn resolve(&self, repo_base: &str) -> GeneratorResult<String> {
        self.validate()?;
        let base = repo_base.trim_end_matches('/');
        Ok(format!(
            "{}/{}/{}/{}/{}",
            base,
            self.group_path(),
            self.artifact_path(),
            self.version,
            self.filename()
        ))
    }

    fn validate(&self) -> GeneratorResult<()> {
        let blank = |s: &str| s.trim().is_empty();
        if blank(&self.group) || blank(&self.name) || blank(&self.version) {
            return Err(GeneratorError::InvalidCoordinate(self.to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.os {
            Some(os) => write!(f, "{}:{}:{}:{}", self.group, self.name, self.version, os),
            None => write!(f, "{}:{}:{}", self.group, self.name, self.version),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = "https://repo1.maven.org/maven2";

    #[test]
    fn parse_simple_coordinate() {
        let a = ArtifactCoordinate::parse("com.jfoenix:jfoenix:9.0.8").unwrap();
        assert_eq!(a.group, "com.jfoenix");
        assert_eq!(a.name, "jfoenix");
        assert_eq!(a.version, "9.0.8");
        assert_eq!(a.os, None);
    }

    #[test]
    fn parse_with_os() {
        let a = ArtifactCoordinate::parse("org.openjfx:javafx.base:17:mac").unwrap();
        assert_eq!(a.os, Some(OsTag::Mac));
    }

    #[test]
    fn parse_rejects_bad_shapes() {
        assert!(ArtifactCoordinate::parse("org.openjfx:javafx.base").is_err());
        assert!(ArtifactCoordinate::parse("org.openjfx:javafx.base:17:solaris").is_err());
        assert!(ArtifactCoordinate::parse("org.openjfx::17").is_err());
    }

    #[test]
    fn url_construction() {
        let a = ArtifactCoordinate::new("org.controlsfx", "controlsfx", "9.0.0", None).unwrap();
        assert_eq!(
            a.resolve(REPO).unwrap(),
            "https://repo1.maven.org/maven2/org/controlsfx/controlsfx/9.0.0/controlsfx-9.0.0.jar"
        );
    }

    #[test]
    fn url_with_os_and_dotted_name() {
        let a = ArtifactCoordinate::new("org.openjfx", "javafx.graphics", "17", Some(OsTag::Windows))
            .unwrap();
        assert_eq!(
            a.resolve(&format!("{REPO}/")).unwrap(),
            "https://repo1.maven.org/maven2/org/openjfx/javafx-graphics/17/javafx-graphics-17-win.jar"
        );
    }

    #[test]
    fn resolve_is_deterministic() {
        let a = ArtifactCoordinate::parse("org.jfxtras:jfxtras-common:10.0-r1").unwrap();
        assert_eq!(a.resolve(REPO).unwrap(), a.resolve(REPO).unwrap());
    }

    #[test]
    fn empty_components_are_invalid() {
        let err = ArtifactCoordinate::new("", "x", "1", None).unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidCoordinate(_)));

        let hand_built = ArtifactCoordinate {
            group: "org.openjfx".into(),
            name: "javafx.base".into(),
            version: " ".into(),
            os: None,
        };
        assert!(hand_built.resolve(REPO).is_err());
    }
}
