//! Raw-data sources.
//!
//! A [`RawDataSource`] supplies the bytes of one raw file of one dataset.
//! Fetching archives and extracting them is someone else's job; loaders
//! only see already-available files. Any error a source returns is a
//! collaborator failure and is reported as
//! [`DatasetError::Unavailable`](crate::DatasetError::Unavailable), never as
//! a format problem.

#![deny(unsafe_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::{DatasetError, FormatError, Result, SourceError};
use crate::manifest::{load_manifest, sha256_hex};
use crate::paths::{dataset_dir_name, datasets_root, is_contained};

/// Supplies raw dataset content to loaders.
pub trait RawDataSource: Send + Sync {
    /// Returns the bytes of `file` belonging to `dataset_id`.
    fn read(&self, dataset_id: &str, file: &str) -> std::result::Result<Vec<u8>, SourceError>;
}

/// Reads a raw file and decodes it as UTF-8.
///
/// Source failures become `Unavailable`; undecodable bytes are a format
/// problem.
pub fn read_text(source: &dyn RawDataSource, dataset_id: &str, file: &str) -> Result<String> {
    let bytes = source
        .read(dataset_id, file)
        .map_err(|e| DatasetError::unavailable(dataset_id, e))?;
    debug!(dataset = dataset_id, file, bytes = bytes.len(), "raw file read");
    String::from_utf8(bytes).map_err(|_| {
        DatasetError::format(
            dataset_id,
            FormatError::Encoding {
                file: file.to_string(),
            },
        )
    })
}

/// Reads pre-extracted files from `<root>/<dataset dir>/<file>`.
///
/// When the dataset directory carries a `manifest.toml`, every file it
/// lists is checked against its pinned SHA-256 before being returned.
/// File names must stay inside the dataset directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Source rooted at [`datasets_root`]; performs no I/O.
    pub fn from_env() -> Self {
        Self::new(datasets_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn dataset_dir(&self, dataset_id: &str) -> PathBuf {
        self.root.join(dataset_dir_name(dataset_id))
    }
}

impl Default for DirectorySource {
    fn default() -> Self {
        Self::from_env()
    }
}

impl RawDataSource for DirectorySource {
    fn read(&self, dataset_id: &str, file: &str) -> std::result::Result<Vec<u8>, SourceError> {
        if !is_contained(file) {
            return Err(SourceError::InvalidPath {
                file: file.to_string(),
            });
        }
        let dir = self.dataset_dir(dataset_id);
        let path = dir.join(file);
        let manifest = load_manifest(&dir)?;

        if let Some(manifest) = &manifest
            && manifest.dataset.id != dataset_id
        {
            return Err(SourceError::manifest(
                &dir,
                format!(
                    "manifest describes dataset {}, expected {dataset_id}",
                    manifest.dataset.id
                ),
            ));
        }

        let pinned = manifest.as_ref().and_then(|m| m.file(file));
        if pinned.is_some() && !path.is_file() {
            return Err(SourceError::MissingFile { path });
        }

        let bytes = std::fs::read(&path).map_err(|e| SourceError::io(&path, e))?;

        if let Some(pinned) = pinned {
            let actual = sha256_hex(&bytes);
            if !actual.eq_ignore_ascii_case(&pinned.sha256) {
                return Err(SourceError::Sha256Mismatch {
                    path,
                    expected: pinned.sha256.clone(),
                    actual,
                });
            }
        }
        Ok(bytes)
    }
}

/// In-memory source keyed by `(dataset id, file name)`.
///
/// Counts reads per file, which makes it handy for checking that a loader
/// touches its raw data exactly once.
#[derive(Debug, Default)]
pub struct MemorySource {
    files: HashMap<(String, String), Vec<u8>>,
    reads: Mutex<HashMap<(String, String), usize>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_file(
        mut self,
        dataset_id: impl Into<String>,
        file: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        self.files
            .insert((dataset_id.into(), file.into()), contents.into());
        self
    }

    /// Number of times `file` of `dataset_id` has been read.
    pub fn read_count(&self, dataset_id: &str, file: &str) -> usize {
        let reads = self.reads.lock().unwrap_or_else(PoisonError::into_inner);
        reads
            .get(&(dataset_id.to_string(), file.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Total number of reads across all files.
    pub fn total_reads(&self) -> usize {
        let reads = self.reads.lock().unwrap_or_else(PoisonError::into_inner);
        reads.values().sum()
    }
}

impl RawDataSource for MemorySource {
    fn read(&self, dataset_id: &str, file: &str) -> std::result::Result<Vec<u8>, SourceError> {
        let key = (dataset_id.to_string(), file.to_string());
        *self
            .reads
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.clone())
            .or_insert(0) += 1;
        self.files
            .get(&key)
            .cloned()
            .ok_or_else(|| SourceError::Unavailable {
                message: format!("no in-memory file {file} for dataset {dataset_id}"),
            })
    }
}
