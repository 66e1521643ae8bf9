//! Optional per-dataset `manifest.toml` pinning raw file checksums.
//!
//! ```toml
//! [dataset]
//! id = "3270903"
//! version = "1"
//!
//! [[files]]
//! path = "conditions.csv"
//! sha256 = "..."
//! ```

#![deny(unsafe_code)]

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::error::SourceError;
use crate::paths::is_contained;

pub const MANIFEST_FILE: &str = "manifest.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub dataset: ManifestHeader,
    #[serde(default)]
    pub files: Vec<ManifestFile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestHeader {
    pub id: String,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestFile {
    pub path: String,
    pub sha256: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl DatasetManifest {
    pub fn file(&self, path: &str) -> Option<&ManifestFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// Reads the manifest in `dataset_dir`, if there is one.
pub fn load_manifest(dataset_dir: &Path) -> Result<Option<DatasetManifest>, SourceError> {
    let path = dataset_dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(&path).map_err(|e| SourceError::io(&path, e))?;
    let manifest: DatasetManifest =
        toml::from_str(&text).map_err(|e| SourceError::manifest(&path, e.to_string()))?;
    validate_manifest(&manifest, &path)?;
    Ok(Some(manifest))
}

fn validate_manifest(manifest: &DatasetManifest, path: &Path) -> Result<(), SourceError> {
    if manifest.dataset.id.trim().is_empty() {
        return Err(SourceError::manifest(path, "dataset.id must not be empty"));
    }
    for file in &manifest.files {
        let valid =
            file.sha256.len() == 64 && file.sha256.chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(SourceError::manifest(
                path,
                format!("invalid sha256 for {}: expected 64 hex characters", file.path),
            ));
        }
        if !is_contained(&file.path) {
            return Err(SourceError::manifest(
                path,
                format!("file path must stay inside the dataset directory: {}", file.path),
            ));
        }
    }
    Ok(())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(sha2::Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_of_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn parses_manifest_files() {
        let manifest: DatasetManifest = toml::from_str(
            r#"
[dataset]
id = "3270903"

[[files]]
path = "conditions.csv"
sha256 = "430cfd2377f84b05af7aab8d5ee5cca68e2582822b3adb8fe3e70a0cb6f70558"
"#,
        )
        .unwrap();
        assert_eq!(manifest.dataset.id, "3270903");
        assert!(manifest.file("conditions.csv").is_some());
        assert!(manifest.file("coordinates.csv").is_none());
        assert!(validate_manifest(&manifest, Path::new("manifest.toml")).is_ok());
    }

    #[test]
    fn rejects_short_checksums() {
        let manifest: DatasetManifest = toml::from_str(
            r#"
[dataset]
id = "3270903"

[[files]]
path = "conditions.csv"
sha256 = "abc"
"#,
        )
        .unwrap();
        let err = validate_manifest(&manifest, Path::new("manifest.toml")).unwrap_err();
        assert!(matches!(err, SourceError::Manifest { .. }));
    }

    fn manifest_for(path: &str) -> DatasetManifest {
        DatasetManifest {
            dataset: ManifestHeader {
                id: "3270903".to_string(),
                version: None,
            },
            files: vec![ManifestFile {
                path: path.to_string(),
                sha256: "0".repeat(64),
                notes: None,
            }],
        }
    }

    #[test]
    fn file_paths_must_stay_inside_the_dataset() {
        let path = Path::new("manifest.toml");
        assert!(validate_manifest(&manifest_for("v1..2.csv"), path).is_ok());
        assert!(validate_manifest(&manifest_for("tables/a.dat"), path).is_ok());
        assert!(validate_manifest(&manifest_for("../conditions.csv"), path).is_err());
        assert!(validate_manifest(&manifest_for("/tmp/conditions.csv"), path).is_err());
    }
}
