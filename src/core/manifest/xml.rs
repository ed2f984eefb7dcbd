// ─── Manifest XML ───
// Document layout consumed by the updater:
//
//   <configuration timestamp="...">
//     <base uri="..." path="..."/>
//     <properties><property key="..." value="..."/></properties>
//     <files><file uri="..." path="..." size="..." checksum="..." .../></files>
//   </configuration>

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::de::from_str;
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::model::{FileRecord, Manifest};
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::platform::OsTag;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Persists a built manifest.
pub trait ManifestWriter: Send + Sync {
    fn write(&self, manifest: &Manifest, dest: &Path) -> GeneratorResult<()>;
}

/// Default writer producing the updater's XML document.
#[derive(Debug, Default, Clone, Copy)]
pub struct XmlManifestWriter;

impl ManifestWriter for XmlManifestWriter {
    /// The whole document is rendered before the destination is touched.
    fn write(&self, manifest: &Manifest, dest: &Path) -> GeneratorResult<()> {
        let xml = render(manifest)?;

        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|source| GeneratorError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(dest, xml).map_err(|source| GeneratorError::Io {
            path: dest.to_path_buf(),
            source,
        })?;

        info!("Wrote manifest {:?} ({} files)", dest, manifest.files.len());
        Ok(())
    }
}

// ─── Document shape ───

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "configuration")]
struct ConfigurationDoc {
    #[serde(rename = "@timestamp")]
    timestamp: String,
    base: BaseDoc,
    #[serde(default)]
    properties: PropertiesDoc,
    #[serde(default)]
    files: FilesDoc,
}

#[derive(Debug, Serialize, Deserialize)]
struct BaseDoc {
    #[serde(rename = "@uri")]
    uri: String,
    #[serde(rename = "@path", default)]
    path: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PropertiesDoc {
    #[serde(rename = "property", default)]
    items: Vec<PropertyDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PropertyDoc {
    #[serde(rename = "@key")]
    key: String,
    #[serde(rename = "@value")]
    value: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct FilesDoc {
    #[serde(rename = "file", default)]
    items: Vec<FileDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FileDoc {
    #[serde(rename = "@uri", default, skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    #[serde(rename = "@path")]
    path: String,
    #[serde(rename = "@size")]
    size: u64,
    #[serde(rename = "@checksum")]
    checksum: String,
    #[serde(rename = "@os", default, skip_serializing_if = "Option::is_none")]
    os: Option<String>,
    #[serde(rename = "@classpath", default, skip_serializing_if = "is_false")]
    classpath: bool,
    #[serde(
        rename = "@ignoreBootConflict",
        default,
        skip_serializing_if = "is_false"
    )]
    ignore_boot_conflict: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

// ─── Conversion ───

/// Render a manifest to its XML document.
pub fn render(manifest: &Manifest) -> GeneratorResult<String> {
    let doc = ConfigurationDoc {
        timestamp: manifest
            .timestamp
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        base: BaseDoc {
            uri: manifest.base_uri.clone(),
            path: manifest.base_path.clone(),
        },
        properties: PropertiesDoc {
            items: manifest
                .properties
                .iter()
                .map(|(key, value)| PropertyDoc {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
        },
        files: FilesDoc {
            items: manifest.files.iter().map(FileDoc::from).collect(),
        },
    };

    let mut body = String::new();
    let mut ser = Serializer::new(&mut body);
    ser.indent(' ', 2);
    doc.serialize(ser)?;

    Ok(format!("{XML_DECLARATION}\n{body}\n"))
}

/// Parse an XML document back into a manifest.
pub fn parse(xml: &str) -> GeneratorResult<Manifest> {
    let doc: ConfigurationDoc = from_str(xml)?;

    let timestamp = DateTime::parse_from_rfc3339(&doc.timestamp)
        .map_err(|e| GeneratorError::Serialization(format!("bad timestamp: {e}")))?
        .with_timezone(&Utc);

    let files = doc
        .files
        .items
        .into_iter()
        .map(FileRecord::try_from)
        .collect::<GeneratorResult<Vec<_>>>()?;

    Ok(Manifest {
        timestamp,
        base_uri: doc.base.uri,
        base_path: doc.base.path,
        files,
        properties: doc
            .properties
            .items
            .into_iter()
            .map(|p| (p.key, p.value))
            .collect(),
    })
}

/// Read and parse a manifest file.
pub fn read_manifest(path: &Path) -> GeneratorResult<Manifest> {
    let xml = std::fs::read_to_string(path).map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&xml)
}

impl From<&FileRecord> for FileDoc {
    fn from(record: &FileRecord) -> Self {
        Self {
            uri: record.uri.clone(),
            path: record.path.clone(),
            size: record.size,
            checksum: record.checksum.clone(),
            os: record.os.map(|os| os.short_name().to_string()),
            classpath: record.classpath,
            ignore_boot_conflict: record.ignore_boot_conflict,
        }
    }
}

impl TryFrom<FileDoc> for FileRecord {
    type Error = GeneratorError;

    fn try_from(doc: FileDoc) -> Result<Self, Self::Error> {
        let os = match doc.os.as_deref() {
            Some(name) => Some(name.parse::<OsTag>().map_err(|_| {
                GeneratorError::Serialization(format!("unknown os '{}' on {}", name, doc.path))
            })?),
            None => None,
        };

        Ok(Self {
            path: doc.path,
            uri: doc.uri,
            size: doc.size,
            checksum: doc.checksum,
            os,
            classpath: doc.classpath,
            ignore_boot_conflict: doc.ignore_boot_conflict,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeMap;

    fn sample() -> Manifest {
        Manifest {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            base_uri: "${maven.central.javafx}".into(),
            base_path: "${user.dir}/bootstrap".into(),
            files: vec![
                FileRecord {
                    path: "../business/config.xml".into(),
                    uri: Some("http://docs.update4j.org/demo/business/config.xml".into()),
                    size: 120,
                    checksum: "1f2e".into(),
                    os: None,
                    classpath: false,
                    ignore_boot_conflict: false,
                },
                FileRecord {
                    path: "javafx-base-17-win.jar".into(),
                    uri: None,
                    size: 7,
                    checksum: "abc".into(),
                    os: Some(OsTag::Windows),
                    classpath: true,
                    ignore_boot_conflict: true,
                },
            ],
            properties: BTreeMap::from([
                ("maven.central".to_string(), "https://repo1.maven.org/maven2".to_string()),
                ("default.launcher.main.class".to_string(), "org.update4j.Bootstrap".to_string()),
            ]),
        }
    }

    #[test]
    fn renders_updater_document() {
        let xml = render(&sample()).unwrap();
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains(r#"<configuration timestamp="2026-01-02T03:04:05Z">"#));
        assert!(xml.contains(r#"<base uri="${maven.central.javafx}" path="${user.dir}/bootstrap"/>"#));
        assert!(xml.contains(r#"<property key="maven.central" value="https://repo1.maven.org/maven2"/>"#));
        assert!(xml.contains(
            r#"<file path="javafx-base-17-win.jar" size="7" checksum="abc" os="win" classpath="true" ignoreBootConflict="true"/>"#
        ));
        assert!(!xml.contains(r#"classpath="false""#));
    }

    #[test]
    fn file_order_is_preserved() {
        let xml = render(&sample()).unwrap();
        let first = xml.find("../business/config.xml").unwrap();
        let second = xml.find("javafx-base-17-win.jar").unwrap();
        assert!(first < second);
    }

    #[test]
    fn parses_rendered_document() {
        let manifest = sample();
        let parsed = parse(&render(&manifest).unwrap()).unwrap();
        assert_eq!(parsed, manifest);
    }

    #[test]
    fn writer_creates_parent_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dest = tmp.path().join("business").join("config.xml");
        XmlManifestWriter.write(&sample(), &dest).unwrap();
        assert_eq!(read_manifest(&dest).unwrap().files.len(), 2);
    }

    #[test]
    fn rejects_unknown_os() {
        let xml = r#"<configuration timestamp="2026-01-02T03:04:05Z">
            <base uri="https://host" path="p"/>
            <files><file path="a.jar" size="1" checksum="1" os="beos"/></files>
        </configuration>"#;
        assert!(matches!(parse(xml), Err(GeneratorError::Serialization(_))));
    }
}
