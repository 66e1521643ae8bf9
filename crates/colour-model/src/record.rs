//! Experiment records and the ordered record mapping.

use std::collections::BTreeMap;
use std::ops::Index;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{RecordError, Result};
use crate::metadata::MetadataValue;

/// One observation row: a tristimulus-like triplet.
pub type Tristimulus = [f64; 3];

/// One named experimental condition.
///
/// Records are immutable once built. Deriving a variant goes through
/// [`ExperimentRecord::with_metadata`], which returns a new record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentRecord {
    name: String,
    coordinates: Vec<Tristimulus>,
    metadata: BTreeMap<String, MetadataValue>,
}

impl ExperimentRecord {
    pub fn new(
        name: impl Into<String>,
        coordinates: Vec<Tristimulus>,
        metadata: BTreeMap<String, MetadataValue>,
    ) -> Self {
        Self {
            name: name.into(),
            coordinates,
            metadata,
        }
    }

    /// The condition name exactly as the source dataset spells it.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observation rows in published trial order.
    pub fn coordinates(&self) -> &[Tristimulus] {
        &self.coordinates
    }

    pub fn metadata(&self) -> &BTreeMap<String, MetadataValue> {
        &self.metadata
    }

    pub fn metadata_value(&self, key: &str) -> Option<&MetadataValue> {
        self.metadata.get(key)
    }

    /// Number of observation rows.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    /// Returns a copy of this record with `key` set to `value`.
    #[must_use]
    pub fn with_metadata(&self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        let mut metadata = self.metadata.clone();
        metadata.insert(key.into(), value.into());
        Self {
            name: self.name.clone(),
            coordinates: self.coordinates.clone(),
            metadata,
        }
    }
}

/// Name → record mapping that iterates in insertion (parse) order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordMap {
    records: Vec<ExperimentRecord>,
    index: BTreeMap<String, usize>,
}

impl RecordMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record, keyed by its name.
    ///
    /// Names are unique; a second record with the same name is rejected and
    /// the map is left unchanged.
    pub fn insert(&mut self, record: ExperimentRecord) -> Result<()> {
        if self.index.contains_key(record.name()) {
            return Err(RecordError::DuplicateRecord {
                name: record.name().to_string(),
            });
        }
        self.index
            .insert(record.name().to_string(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ExperimentRecord> {
        self.index.get(name).map(|&idx| &self.records[idx])
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.iter().map(ExperimentRecord::name)
    }

    pub fn values(&self) -> impl Iterator<Item = &ExperimentRecord> + '_ {
        self.records.iter()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExperimentRecord)> + '_ {
        self.records.iter().map(|record| (record.name(), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Index<&str> for RecordMap {
    type Output = ExperimentRecord;

    /// # Panics
    ///
    /// Panics if no record is named `name`.
    fn index(&self, name: &str) -> &Self::Output {
        match self.get(name) {
            Some(record) => record,
            None => panic!("no record named '{name}'"),
        }
    }
}

impl Serialize for RecordMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(record.name(), record)?;
        }
        map.end()
    }
}
