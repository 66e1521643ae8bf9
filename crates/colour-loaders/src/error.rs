//! Error types for dataset loading.
//!
//! Failures fall into two domains that callers must be able to tell apart:
//! the raw-data source could not supply content ([`SourceError`]), or the
//! content it supplied does not match the dataset schema ([`FormatError`]).
//! Both are wrapped in a [`DatasetError`] that names the dataset.

#![deny(unsafe_code)]

use std::path::PathBuf;

use colour_model::RecordError;

/// Failure of a raw-data source to supply content.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("invalid manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("file name escapes the dataset directory: {file}")]
    InvalidPath { file: String },

    #[error("{message}")]
    Unavailable { message: String },
}

impl SourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn manifest(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Manifest {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Raw content that does not match the dataset schema.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("condition '{condition}' row {row}: expected {expected} values, found {found}")]
    RowWidth {
        condition: String,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("condition '{condition}' row {row}: '{value}' is not a decimal number")]
    InvalidNumber {
        condition: String,
        row: usize,
        value: String,
    },

    #[error("condition '{condition}' is missing metadata field '{field}'")]
    MissingMetadata { condition: String, field: String },

    #[error("condition '{condition}': {source}")]
    InvalidMetadata {
        condition: String,
        #[source]
        source: RecordError,
    },

    #[error("condition '{condition}' has no observation rows")]
    EmptyCondition { condition: String },

    #[error("duplicate condition '{condition}'")]
    DuplicateCondition { condition: String },

    #[error("expected {expected} conditions, found {found}")]
    ConditionCount { expected: usize, found: usize },

    #[error("failed to parse CSV {file}: {message}")]
    Csv { file: String, message: String },

    #[error("{file} is not valid UTF-8")]
    Encoding { file: String },

    #[error("unexpected layout in {file}: {message}")]
    Layout { file: String, message: String },
}

impl FormatError {
    pub(crate) fn csv(file: &str, err: &csv::Error) -> Self {
        Self::Csv {
            file: file.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn layout(file: &str, message: impl Into<String>) -> Self {
        Self::Layout {
            file: file.to_string(),
            message: message.into(),
        }
    }
}

/// Error surfaced to callers of `load` and the builders.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset {dataset} violates the loader contract: {message}")]
    ContractViolation { dataset: String, message: String },

    #[error("dataset {dataset} is unavailable: {source}")]
    Unavailable {
        dataset: String,
        #[source]
        source: SourceError,
    },

    #[error("dataset {dataset} is malformed: {source}")]
    Format {
        dataset: String,
        #[source]
        source: FormatError,
    },

    #[error("dataset {dataset} is not registered")]
    NotRegistered { dataset: String },
}

impl DatasetError {
    pub fn unavailable(dataset: &str, source: SourceError) -> Self {
        Self::Unavailable {
            dataset: dataset.to_string(),
            source,
        }
    }

    pub fn format(dataset: &str, source: FormatError) -> Self {
        Self::Format {
            dataset: dataset.to_string(),
            source,
        }
    }

    pub fn contract(dataset: &str, message: impl Into<String>) -> Self {
        Self::ContractViolation {
            dataset: dataset.to_string(),
            message: message.into(),
        }
    }

    /// Identifier of the dataset the error belongs to.
    pub fn dataset(&self) -> &str {
        match self {
            Self::ContractViolation { dataset, .. }
            | Self::Unavailable { dataset, .. }
            | Self::Format { dataset, .. }
            | Self::NotRegistered { dataset } => dataset,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format { .. })
    }
}

/// Result type for dataset operations.
pub type Result<T> = std::result::Result<T, DatasetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_names_dataset_and_domain() {
        let err = DatasetError::unavailable(
            "3270903",
            SourceError::MissingFile {
                path: PathBuf::from("datasets/3270903/conditions.csv"),
            },
        );
        assert_eq!(err.dataset(), "3270903");
        assert!(err.is_unavailable());
        assert!(!err.is_format());
        insta::assert_snapshot!(
            err.to_string(),
            @"dataset 3270903 is unavailable: missing file listed in manifest: datasets/3270903/conditions.csv"
        );
    }

    #[test]
    fn format_error_display() {
        let err = DatasetError::format(
            "3270903",
            FormatError::RowWidth {
                condition: "CSAJ-C - da".to_string(),
                row: 4,
                expected: 3,
                found: 2,
            },
        );
        assert!(err.is_format());
        insta::assert_snapshot!(
            err.to_string(),
            @"dataset 3270903 is malformed: condition 'CSAJ-C - da' row 4: expected 3 values, found 2"
        );
    }
}
