// ─── Manifest Builder ───
// Turns a `ManifestSpec` into an immutable `Manifest` in one pass.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use tracing::debug;

use super::model::{FileDecl, FileRecord, LiteralFile, Manifest, ManifestSpec};
use crate::core::cache::list_file_names;
use crate::core::error::{GeneratorError, GeneratorResult};
use crate::core::platform::PlatformFamily;

/// Build a manifest from its declarations.
///
/// Literal files keep their declared position; a directory scan expands in
/// place to one record per family member, ordered by file name. Files in a
/// scanned directory that don't follow the naming convention are skipped.
pub async fn build(spec: &ManifestSpec) -> GeneratorResult<Manifest> {
    if spec.base_uri.trim().is_empty() {
        return Err(GeneratorError::InvalidManifest("base URI is empty".into()));
    }

    let mut files = Vec::new();
    for decl in &spec.files {
        match decl {
            FileDecl::Literal(file) => files.push(literal_record(file).await?),
            FileDecl::DirectoryScan {
                dir,
                family,
                repository,
            } => files.extend(scan_records(dir, family, repository).await?),
        }
    }

    let mut seen = HashSet::new();
    if let Some(dup) = files.iter().find(|f| !seen.insert(f.path.as_str())) {
        return Err(GeneratorError::InvalidManifest(format!(
            "duplicate file path '{}'",
            dup.path
        )));
    }

    debug!(
        "Built manifest for {} with {} files",
        spec.base_uri,
        files.len()
    );

    Ok(Manifest {
        timestamp: Utc::now(),
        base_uri: spec.base_uri.clone(),
        base_path: spec.base_path.clone(),
        files,
        properties: spec.properties.clone(),
    })
}

async fn literal_record(file: &LiteralFile) -> GeneratorResult<FileRecord> {
    let path = match &file.path {
        Some(p) => p.clone(),
        None => file_name_of(&file.source)?,
    };
    let (size, checksum) = read_metadata(&file.source).await?;

    Ok(FileRecord {
        path,
        uri: file.uri.clone(),
        size,
        checksum,
        os: file.os,
        classpath: file.classpath,
        ignore_boot_conflict: file.ignore_boot_conflict,
    })
}

async fn scan_records(
    dir: &Path,
    family: &PlatformFamily,
    repository: &str,
) -> GeneratorResult<Vec<FileRecord>> {
    let mut records = Vec::new();

    for name in list_file_names(dir).await? {
        if !family.claims(&name) {
            continue;
        }
        let Some(parsed) = family.parse(&name) else {
            debug!("Skipping off-convention file in scan: {}", name);
            continue;
        };

        let uri = family.coordinate(&parsed)?.resolve(repository)?;
        let (size, checksum) = read_metadata(&dir.join(&name)).await?;

        records.push(FileRecord {
            path: name,
            uri: Some(uri),
            size,
            checksum,
            os: parsed.os,
            classpath: true,
            ignore_boot_conflict: true,
        });
    }

    Ok(records)
}

/// Size and Adler-32 checksum of a file.
async fn read_metadata(path: &Path) -> GeneratorResult<(u64, String)> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| GeneratorError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let checksum = format!("{:x}", adler2::adler32_slice(&bytes));
    Ok((bytes.len() as u64, checksum))
}

fn file_name_of(path: &Path) -> GeneratorResult<String> {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| {
            GeneratorError::InvalidManifest(format!("{:?} does not name a file", path))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::platform::OsTag;
    use std::collections::BTreeMap;

    const REPO: &str = "https://repo.test/maven2";

    fn write(dir: &Path, name: &str, body: &[u8]) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    fn scan(dir: &Path) -> FileDecl {
        FileDecl::DirectoryScan {
            dir: dir.to_path_buf(),
            family: PlatformFamily::default(),
            repository: REPO.to_string(),
        }
    }

    #[tokio::test]
    async fn literals_keep_order_before_scan() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("cache");
        std::fs::create_dir(&cache).unwrap();
        write(tmp.path(), "b.jar", b"bbb");
        write(tmp.path(), "a.jar", b"a");
        write(&cache, "javafx-base-17-win.jar", b"win");
        write(&cache, "javafx-base-17-linux.jar", b"linux");

        let spec = ManifestSpec {
            base_uri: "https://host/app".into(),
            base_path: "${user.dir}/app".into(),
            files: vec![
                LiteralFile::new(tmp.path().join("b.jar")).on_classpath().into(),
                LiteralFile::new(tmp.path().join("a.jar"))
                    .with_uri("https://mirror/a.jar")
                    .into(),
                scan(&cache),
            ],
            properties: BTreeMap::from([("k".to_string(), "v".to_string())]),
        };

        let manifest = build(&spec).await.unwrap();
        let paths: Vec<_> = manifest.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["b.jar", "a.jar", "javafx-base-17-linux.jar", "javafx-base-17-win.jar"]
        );

        let b = &manifest.files[0];
        assert!(b.classpath);
        assert_eq!(b.uri, None);
        assert_eq!(b.size, 3);
        assert!(!b.ignore_boot_conflict);
        assert_eq!(manifest.files[1].uri.as_deref(), Some("https://mirror/a.jar"));
        assert_eq!(manifest.properties["k"], "v");
    }

    #[tokio::test]
    async fn scan_records_are_platform_entries() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "javafx-graphics-17-mac.jar", b"gfx");

        let spec = ManifestSpec {
            base_uri: "${maven.central.javafx}".into(),
            files: vec![scan(tmp.path())],
            ..Default::default()
        };
        let manifest = build(&spec).await.unwrap();
        let record = &manifest.files[0];

        assert!(record.classpath);
        assert!(record.ignore_boot_conflict);
        assert_eq!(record.os, Some(OsTag::Mac));
        assert_eq!(
            record.uri.as_deref(),
            Some("https://repo.test/maven2/org/openjfx/javafx-graphics/17/javafx-graphics-17-mac.jar")
        );
    }

    #[tokio::test]
    async fn off_convention_files_do_not_change_the_count() {
        let clean = tempfile::tempdir().unwrap();
        let noisy = tempfile::tempdir().unwrap();
        for dir in [clean.path(), noisy.path()] {
            write(dir, "javafx-base-17-win.jar", b"x");
            write(dir, "javafx-base-17-linux.jar", b"y");
        }
        write(noisy.path(), "javafx-readme.txt", b"z");
        write(noisy.path(), "other-1.0.jar", b"z");

        let spec_for = |dir: &Path| ManifestSpec {
            base_uri: "https://host".into(),
            files: vec![scan(dir)],
            ..Default::default()
        };
        let a = build(&spec_for(clean.path())).await.unwrap();
        let b = build(&spec_for(noisy.path())).await.unwrap();
        assert_eq!(a.files.len(), b.files.len());
    }

    #[tokio::test]
    async fn checksum_is_adler32_hex() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "w.txt", b"Wikipedia");

        let spec = ManifestSpec {
            base_uri: "https://host".into(),
            files: vec![LiteralFile::new(tmp.path().join("w.txt")).into()],
            ..Default::default()
        };
        let manifest = build(&spec).await.unwrap();
        assert_eq!(manifest.files[0].checksum, "11e60398");
        assert_eq!(manifest.files[0].size, 9);
    }

    #[tokio::test]
    async fn explicit_path_overrides_file_name() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "config.xml", b"<configuration/>");

        let spec = ManifestSpec {
            base_uri: "https://host".into(),
            files: vec![LiteralFile::new(tmp.path().join("config.xml"))
                .with_path("../business/config.xml")
                .into()],
            ..Default::default()
        };
        let manifest = build(&spec).await.unwrap();
        assert!(manifest.find("../business/config.xml").is_some());
    }

    #[tokio::test]
    async fn rejects_invalid_specs() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.jar", b"a");

        let no_base = ManifestSpec::default();
        assert!(matches!(
            build(&no_base).await,
            Err(GeneratorError::InvalidManifest(_))
        ));

        let duplicate = ManifestSpec {
            base_uri: "https://host".into(),
            files: vec![
                LiteralFile::new(tmp.path().join("a.jar")).into(),
                LiteralFile::new(tmp.path().join("a.jar")).into(),
            ],
            ..Default::default()
        };
        assert!(matches!(
            build(&duplicate).await,
            Err(GeneratorError::InvalidManifest(_))
        ));

        let missing = ManifestSpec {
            base_uri: "https://host".into(),
            files: vec![LiteralFile::new(tmp.path().join("gone.jar")).into()],
            ..Default::default()
        };
        assert!(matches!(build(&missing).await, Err(GeneratorError::Io { .. })));
    }
}
