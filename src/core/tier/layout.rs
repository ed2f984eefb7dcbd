// ─── Project Layout ───
// The hand-enumerated file lists of both tiers. The built-in default is the
// demo application; a JSON file can replace it.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::maven::ArtifactCoordinate;
use crate::core::platform::PlatformFamily;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectLayout {
    pub business: BusinessTier,
    pub bootstrap: BootstrapTier,
}

/// Application payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessTier {
    pub base_uri: String,
    pub base_path: String,
    /// Served from the base URI, so it carries no explicit origin.
    pub application_jar: String,
    pub libraries: Vec<LibraryDecl>,
    /// File name of the manifest inside `<config-dir>/business`.
    pub output: String,
}

/// A third-party jar served from the remote repository.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LibraryDecl {
    pub file: String,
    /// `group:name:version`
    pub coordinate: String,
}

/// Launcher plus platform-native dependencies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct BootstrapTier {
    pub base_uri: String,
    pub base_path: String,
    pub launcher_jar: String,
    pub launcher_uri: String,
    pub main_class: String,
    pub platform: PlatformFamily,
    /// File name of the manifest inside `<config-dir>`.
    pub output: String,
}

impl Default for BusinessTier {
    fn default() -> Self {
        let lib = |file: &str, coordinate: &str| LibraryDecl {
            file: file.to_string(),
            coordinate: coordinate.to_string(),
        };

        Self {
            base_uri: "http://docs.update4j.org/demo/business".to_string(),
            base_path: "${user.dir}/business".to_string(),
            application_jar: "business-1.0.0.jar".to_string(),
            libraries: vec![
                lib("controlsfx-9.0.0.jar", "org.controlsfx:controlsfx:9.0.0"),
                lib("jfoenix-9.0.8.jar", "com.jfoenix:jfoenix:9.0.8"),
                lib("jfxtras-common-10.0-r1.jar", "org.jfxtras:jfxtras-common:10.0-r1"),
                lib(
                    "jfxtras-gauge-linear-10.0-r1.jar",
                    "org.jfxtras:jfxtras-gauge-linear:10.0-r1",
                ),
            ],
            output: "config.xml".to_string(),
        }
    }
}

impl Default for BootstrapTier {
    fn default() -> Self {
        Self {
            base_uri: "${maven.central.javafx}".to_string(),
            base_path: "${user.dir}/bootstrap".to_string(),
            launcher_jar: "bootstrap-1.0.0.jar".to_string(),
            launcher_uri: "http://docs.update4j.org/demo/bootstrap/bootstrap-1.0.0.jar".to_string(),
            main_class: "org.update4j.Bootstrap".to_string(),
            platform: PlatformFamily::default(),
            output: "setup.xml".to_string(),
        }
    }
}

impl ProjectLayout {
    /// Load a layout from JSON; omitted fields keep their defaults.
    pub fn load(path: &Path) -> GeneratorResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout: ProjectLayout = serde_json::from_str(&raw)?;
        layout.validate()?;

        info!("Loaded project layout from {:?}", path);
        Ok(layout)
    }

    /// Reject layouts that could only fail later, mid-run.
    pub fn validate(&self) -> GeneratorResult<()> {
        for lib in &self.business.libraries {
            ArtifactCoordinate::parse(&lib.coordinate)?;
        }
        for (what, name) in [
            ("business output", &self.business.output),
            ("bootstrap output", &self.bootstrap.output),
            ("application jar", &self.business.application_jar),
            ("launcher jar", &self.bootstrap.launcher_jar),
            ("platform prefix", &self.bootstrap.platform.prefix),
        ] {
            if name.trim().is_empty() {
                return Err(GeneratorError::InvalidManifest(format!("{what} is empty")));
            }
        }
        Ok(())
    }
}

impl BusinessTier {
    /// Where the bootstrap tier can re-download this tier's manifest.
    pub fn manifest_uri(&self) -> String {
        format!("{}/{}", self.base_uri.trim_end_matches('/'), self.output)
    }
}
