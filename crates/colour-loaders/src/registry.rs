//! Registry of shipped datasets, indexed by identifier.
//!
//! The registry stores one [`DatasetEntry`] per dataset. An entry carries
//! the dataset's static identity and a builder that goes through the
//! process-wide cache, so building through the registry and through the
//! per-dataset `build_*` function yields the same records.
//!
//! # Example
//!
//! ```ignore
//! use colour_loaders::default_registry;
//!
//! let registry = default_registry();
//! let records = registry.build("3270903")?;
//! ```

#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::OnceLock;

use colour_model::RecordMap;
use tracing::error;

use crate::cache::build;
use crate::datasets::{Breneman1987DatasetLoader, Luo1999DatasetLoader};
use crate::error::{DatasetError, Result};
use crate::loader::DatasetLoader;

/// Builder returning the records of a cached dataset.
pub type BuildFn = fn() -> Result<&'static RecordMap>;

/// Static description of one registered dataset.
#[derive(Debug, Clone, Copy)]
pub struct DatasetEntry {
    pub id: &'static str,
    pub name: &'static str,
    build: BuildFn,
}

impl DatasetEntry {
    /// Entry for loader type `L`.
    pub fn of<L: DatasetLoader>() -> Self {
        Self {
            id: L::ID,
            name: L::NAME,
            build: build_records::<L>,
        }
    }

    /// Entry with a custom builder.
    pub fn new(id: &'static str, name: &'static str, build: BuildFn) -> Self {
        Self { id, name, build }
    }

    pub fn build(&self) -> Result<&'static RecordMap> {
        (self.build)()
    }
}

fn build_records<L: DatasetLoader>() -> Result<&'static RecordMap> {
    build::<L>().map(L::data)
}

/// Registry of datasets indexed by identifier.
#[derive(Debug, Default)]
pub struct DatasetRegistry {
    entries: BTreeMap<&'static str, DatasetEntry>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dataset.
    ///
    /// # Errors
    ///
    /// Returns `ContractViolation` for an empty identifier or one that is
    /// already registered.
    pub fn register(&mut self, entry: DatasetEntry) -> Result<()> {
        if entry.id.trim().is_empty() {
            return Err(DatasetError::contract(
                entry.name,
                "cannot register a dataset without an ID",
            ));
        }
        if self.entries.contains_key(entry.id) {
            return Err(DatasetError::contract(
                entry.id,
                "a dataset with this ID is already registered",
            ));
        }
        self.entries.insert(entry.id, entry);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&DatasetEntry> {
        self.entries.get(id)
    }

    /// Builds (or fetches from the cache) the records of dataset `id`.
    pub fn build(&self, id: &str) -> Result<&'static RecordMap> {
        self.get(id)
            .ok_or_else(|| DatasetError::NotRegistered {
                dataset: id.to_string(),
            })?
            .build()
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = &DatasetEntry> + '_ {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Cached default registry with all shipped datasets.
static DEFAULT_REGISTRY: OnceLock<DatasetRegistry> = OnceLock::new();

/// Returns the registry of every shipped dataset.
///
/// The registry is built on first access. Registering it does not load
/// anything; datasets are loaded when built.
pub fn default_registry() -> &'static DatasetRegistry {
    DEFAULT_REGISTRY.get_or_init(build_default_registry)
}

fn build_default_registry() -> DatasetRegistry {
    let mut registry = DatasetRegistry::new();
    for entry in [
        DatasetEntry::of::<Breneman1987DatasetLoader>(),
        DatasetEntry::of::<Luo1999DatasetLoader>(),
    ] {
        if let Err(err) = registry.register(entry) {
            error!(dataset = entry.id, error = %err, "skipping dataset registration");
        }
    }
    registry
}
