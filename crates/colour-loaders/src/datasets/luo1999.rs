//! Luo & Rhodes (1999) corresponding-colour datasets.
//!
//! Raw layout:
//!
//! - `conditions.csv`: one row per experimental condition. `Name` holds the
//!   record key exactly as published (e.g. `CSAJ-C - da`); every other
//!   column is metadata.
//! - `coordinates.csv`: long table `Name,X,Y,Z`, one row per corresponding
//!   test colour, in trial order.
//!
//! Tristimulus values are published on a 0-100 scale; the dataset's
//! documented convention stores them divided by 100.
//!
//! No raw files ship with the crate. The default source reads them from
//! [`datasets_root`](crate::paths::datasets_root).

#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use colour_model::{MetadataKind, MetadataValue, RecordMap};

use crate::cache::build;
use crate::error::{DatasetError, FormatError, Result};
use crate::loader::{DatasetLoader, LoadState};
use crate::parse::{DatasetSchema, RawCondition, parse_records};
use crate::source::{RawDataSource, read_text};
use crate::tokenize::read_csv_table;

const CONDITIONS_FILE: &str = "conditions.csv";
const COORDINATES_FILE: &str = "coordinates.csv";
const NAME_COLUMN: &str = "Name";
const SAMPLE_SIZE: &str = "Sample Size";

const SCHEMA: DatasetSchema = DatasetSchema {
    scale: 0.01,
    required_metadata: &[
        ("Experimental Method", MetadataKind::String),
        ("Illuminant (Test)", MetadataKind::String),
        ("Illuminant (Reference)", MetadataKind::String),
        (SAMPLE_SIZE, MetadataKind::Integer),
        ("Y_w (Test)", MetadataKind::Float),
    ],
    allow_empty_conditions: false,
    expected_conditions: Some(37),
};

/// Loader for the Luo & Rhodes (1999) corresponding-colour datasets.
#[derive(Debug, Default)]
pub struct Luo1999DatasetLoader {
    state: LoadState,
}

impl Luo1999DatasetLoader {
    pub fn with_source(source: Arc<dyn RawDataSource>) -> Self {
        Self {
            state: LoadState::new(source),
        }
    }
}

impl DatasetLoader for Luo1999DatasetLoader {
    const ID: &'static str = "3270903";
    const NAME: &'static str = "Luo 1999";

    fn state(&self) -> &LoadState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut LoadState {
        &mut self.state
    }

    fn parse(source: &dyn RawDataSource) -> Result<RecordMap> {
        let conditions = read_text(source, Self::ID, CONDITIONS_FILE)?;
        let coordinates = read_text(source, Self::ID, COORDINATES_FILE)?;

        let format = |e| DatasetError::format(Self::ID, e);
        let raw = tokenize(&conditions, &coordinates).map_err(format)?;
        let records = parse_records(&SCHEMA, raw).map_err(format)?;
        check_sample_sizes(&records).map_err(format)?;
        Ok(records)
    }
}

/// Returns the process-wide Luo 1999 loader, loading it on first use.
pub fn build_luo1999() -> Result<&'static Luo1999DatasetLoader> {
    build::<Luo1999DatasetLoader>()
}

fn tokenize(
    conditions: &str,
    coordinates: &str,
) -> std::result::Result<Vec<RawCondition>, FormatError> {
    let table = read_csv_table(CONDITIONS_FILE, conditions)?;
    let name_idx = table.require_column(CONDITIONS_FILE, NAME_COLUMN)?;

    let mut raw = Vec::with_capacity(table.rows.len());
    let mut positions = BTreeMap::new();
    for (row_idx, row) in table.rows.iter().enumerate() {
        let name = &row[name_idx];
        if name.is_empty() {
            return Err(FormatError::layout(
                CONDITIONS_FILE,
                format!("row {} has an empty {NAME_COLUMN}", row_idx + 1),
            ));
        }
        if positions.insert(name.clone(), raw.len()).is_some() {
            return Err(FormatError::DuplicateCondition {
                condition: name.clone(),
            });
        }
        let mut condition = RawCondition::new(name.clone());
        for (col_idx, value) in row.iter().enumerate() {
            if col_idx != name_idx {
                condition
                    .metadata
                    .insert(table.headers[col_idx].clone(), value.clone());
            }
        }
        raw.push(condition);
    }

    let table = read_csv_table(COORDINATES_FILE, coordinates)?;
    let name_idx = table.require_column(COORDINATES_FILE, NAME_COLUMN)?;
    for row in &table.rows {
        let name = &row[name_idx];
        let Some(&position) = positions.get(name) else {
            return Err(FormatError::layout(
                COORDINATES_FILE,
                format!("coordinates for undeclared condition '{name}'"),
            ));
        };
        let tokens = row
            .iter()
            .enumerate()
            .filter(|(col_idx, _)| *col_idx != name_idx)
            .map(|(_, value)| value.clone())
            .collect();
        raw[position].rows.push(tokens);
    }
    Ok(raw)
}

/// Each condition publishes its sample size; it must match the rows found.
fn check_sample_sizes(records: &RecordMap) -> std::result::Result<(), FormatError> {
    for record in records.values() {
        let declared = record
            .metadata_value(SAMPLE_SIZE)
            .and_then(MetadataValue::as_i64)
            .unwrap_or_default();
        if usize::try_from(declared).ok() != Some(record.len()) {
            return Err(FormatError::layout(
                CONDITIONS_FILE,
                format!(
                    "condition '{}' declares {SAMPLE_SIZE} {declared} but has {} rows",
                    record.name(),
                    record.len()
                ),
            ));
        }
    }
    Ok(())
}
