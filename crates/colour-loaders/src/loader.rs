//! The dataset loader contract.
//!
//! # Architecture
//!
//! Every dataset is a type implementing [`DatasetLoader`]. The type names
//! its identifier up front ([`DatasetLoader::ID`]), owns a [`LoadState`]
//! holding the raw-data source and the parsed records, and provides its
//! own [`DatasetLoader::parse`] policy. Callers only ever use `id`, `data`
//! and `load`.
//!
//! # Example
//!
//! ```ignore
//! use colour_loaders::{DatasetLoader, Luo1999DatasetLoader};
//!
//! let mut dataset = Luo1999DatasetLoader::default();
//! let records = dataset.load()?;
//! let method = &records["CSAJ-C - da"].metadata()["Experimental Method"];
//! ```

#![deny(unsafe_code)]

use std::sync::Arc;
use std::time::Instant;

use colour_model::RecordMap;
use tracing::{debug, info};

use crate::error::{DatasetError, Result};
use crate::source::{DirectorySource, RawDataSource};

/// Raw-data source plus the records parsed from it.
///
/// `data` stays empty until a parse succeeds, then holds every record of
/// the dataset. A failed parse leaves it untouched.
pub struct LoadState {
    source: Arc<dyn RawDataSource>,
    data: RecordMap,
    loaded: bool,
}

impl LoadState {
    pub fn new(source: Arc<dyn RawDataSource>) -> Self {
        Self {
            source,
            data: RecordMap::new(),
            loaded: false,
        }
    }

    pub fn source(&self) -> &dyn RawDataSource {
        self.source.as_ref()
    }

    pub fn data(&self) -> &RecordMap {
        &self.data
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Runs `parse` once and keeps its result.
    ///
    /// Later calls return the stored records without touching the source.
    pub fn load_with<F>(&mut self, dataset: &str, parse: F) -> Result<&RecordMap>
    where
        F: FnOnce(&dyn RawDataSource) -> Result<RecordMap>,
    {
        if self.loaded {
            debug!(dataset, records = self.data.len(), "dataset already loaded");
            return Ok(&self.data);
        }

        let start = Instant::now();
        let data = parse(self.source.as_ref())?;
        info!(
            dataset,
            records = data.len(),
            duration_ms = start.elapsed().as_millis(),
            "dataset loaded"
        );
        self.data = data;
        self.loaded = true;
        Ok(&self.data)
    }
}

impl Default for LoadState {
    fn default() -> Self {
        Self::new(Arc::new(DirectorySource::from_env()))
    }
}

impl std::fmt::Debug for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadState")
            .field("records", &self.data.len())
            .field("loaded", &self.loaded)
            .finish_non_exhaustive()
    }
}

/// Contract every dataset loader satisfies.
///
/// `Default` must be cheap and perform no I/O; all raw-data access happens
/// in [`DatasetLoader::load`].
///
/// # Implementing a Loader
///
/// 1. Declare `ID` and `NAME`
/// 2. Store a [`LoadState`] and expose it through `state` / `state_mut`
/// 3. Implement `parse` with the dataset's tokenizer and schema
/// 4. Add a `build_<name>` function and register it in
///    [`default_registry`](crate::default_registry)
pub trait DatasetLoader: Default + Send + Sync + 'static {
    /// Stable identifier, e.g. an accession number or DOI.
    const ID: &'static str;

    /// Short human-readable name.
    const NAME: &'static str;

    fn state(&self) -> &LoadState;

    fn state_mut(&mut self) -> &mut LoadState;

    /// Reads the dataset's raw files from `source` and builds its records.
    ///
    /// # Errors
    ///
    /// `Unavailable` when the source cannot supply a file, `Format` when
    /// the content does not match the dataset schema.
    fn parse(source: &dyn RawDataSource) -> Result<RecordMap>;

    fn id(&self) -> &'static str {
        Self::ID
    }

    /// Parsed records; empty until [`DatasetLoader::load`] succeeds.
    fn data(&self) -> &RecordMap {
        self.state().data()
    }

    fn is_loaded(&self) -> bool {
        self.state().is_loaded()
    }

    /// Parses the raw data on first call and returns the records.
    ///
    /// Idempotent: once loaded, the same records are returned and the
    /// raw-data source is not consulted again.
    fn load(&mut self) -> Result<&RecordMap> {
        self.state_mut().load_with(Self::ID, Self::parse)
    }
}

/// Checks the statically declared parts of a loader.
///
/// # Errors
///
/// Returns `ContractViolation` when `ID` or `NAME` is empty or `ID`
/// carries surrounding whitespace.
pub fn ensure_contract<L: DatasetLoader>() -> Result<()> {
    if L::ID.is_empty() {
        return Err(DatasetError::contract(L::NAME, "ID must not be empty"));
    }
    if L::ID.trim() != L::ID {
        return Err(DatasetError::contract(
            L::ID,
            "ID must not have surrounding whitespace",
        ));
    }
    if L::NAME.trim().is_empty() {
        return Err(DatasetError::contract(L::ID, "NAME must not be empty"));
    }
    Ok(())
}
