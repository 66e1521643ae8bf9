//! Loaders for published colorimetric experiment datasets.
//!
//! Every dataset implements the [`DatasetLoader`] contract: a stable `ID`,
//! a `data` mapping of [`ExperimentRecord`]s and a `load` operation that
//! parses the raw files once. [`build`] (and the per-dataset `build_*`
//! functions) memoize a loaded instance per loader type for the lifetime
//! of the process.
//!
//! # Features
//!
//! - **Contract**: [`DatasetLoader`] with shared idempotent loading
//! - **Parsing**: [`parse_records`] validates tokenized conditions against a [`DatasetSchema`]
//! - **Sources**: [`DirectorySource`] with manifest checksums, [`MemorySource`] for embedding
//! - **Caching**: [`build`], [`build_luo1999`], [`build_breneman1987`]
//! - **Registry**: [`default_registry`] for lookup by identifier
//!
//! # Example
//!
//! ```ignore
//! use colour_loaders::build_luo1999;
//!
//! let luo1999 = build_luo1999()?;
//! let record = &luo1999.data()["CSAJ-C - da"];
//! println!("{} rows", record.coordinates().len());
//! ```

#![deny(unsafe_code)]

pub mod cache;
pub mod datasets;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod parse;
pub mod paths;
pub mod registry;
pub mod source;
pub mod tokenize;

// === Error Types ===
pub use error::{DatasetError, FormatError, Result, SourceError};

// === Contract ===
pub use loader::{DatasetLoader, LoadState, ensure_contract};

// === Parsing ===
pub use parse::{DatasetSchema, RawCondition, parse_records};

// === Raw-Data Sources ===
pub use source::{DirectorySource, MemorySource, RawDataSource, read_text};

// === Build Cache ===
pub use cache::{build, is_built};

// === Datasets ===
pub use datasets::{
    Breneman1987DatasetLoader, Luo1999DatasetLoader, build_breneman1987, build_luo1999,
};

// === Registry ===
pub use registry::{DatasetEntry, DatasetRegistry, default_registry};

pub use colour_model::{ExperimentRecord, MetadataKind, MetadataValue, RecordMap, Tristimulus};
