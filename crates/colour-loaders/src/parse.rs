//! Turning tokenized conditions into experiment records.
//!
//! Per-dataset loaders split their raw files into [`RawCondition`]s; this
//! module validates them against the dataset's [`DatasetSchema`] and builds
//! the [`RecordMap`]. The map is returned only once every condition has
//! been validated, so a failure never leaves a half-built mapping behind.

#![deny(unsafe_code)]

use std::collections::BTreeMap;

use colour_model::{ExperimentRecord, MetadataKind, MetadataValue, RecordMap, Tristimulus};

use crate::error::FormatError;

/// Number of values in every observation row.
pub const ROW_WIDTH: usize = 3;

/// Parsing policy of one dataset.
#[derive(Debug, Clone, Copy)]
pub struct DatasetSchema {
    /// Factor applied to every parsed value.
    ///
    /// `1.0` unless the dataset's published convention says otherwise; the
    /// parser never rescales on its own.
    pub scale: f64,
    /// Metadata fields every condition must carry, with their kinds.
    pub required_metadata: &'static [(&'static str, MetadataKind)],
    /// Whether a condition may have zero observation rows.
    pub allow_empty_conditions: bool,
    /// Number of conditions the dataset declares, if fixed.
    pub expected_conditions: Option<usize>,
}

impl Default for DatasetSchema {
    fn default() -> Self {
        Self {
            scale: 1.0,
            required_metadata: &[],
            allow_empty_conditions: true,
            expected_conditions: None,
        }
    }
}

/// One condition as tokenized from the raw source.
#[derive(Debug, Clone, Default)]
pub struct RawCondition {
    /// Canonical name, byte-for-byte as the source spells it.
    pub name: String,
    /// Numeric tokens per row, in source order.
    pub rows: Vec<Vec<String>>,
    /// Raw metadata cells keyed by published field name.
    pub metadata: BTreeMap<String, String>,
}

impl RawCondition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Validate `conditions` against `schema` and build the record map.
pub fn parse_records(
    schema: &DatasetSchema,
    conditions: Vec<RawCondition>,
) -> Result<RecordMap, FormatError> {
    let mut records = RecordMap::new();
    for condition in conditions {
        let record = parse_condition(schema, condition)?;
        let name = record.name().to_string();
        records
            .insert(record)
            .map_err(|_| FormatError::DuplicateCondition { condition: name })?;
    }

    if let Some(expected) = schema.expected_conditions
        && records.len() != expected
    {
        return Err(FormatError::ConditionCount {
            expected,
            found: records.len(),
        });
    }
    Ok(records)
}

fn parse_condition(
    schema: &DatasetSchema,
    condition: RawCondition,
) -> Result<ExperimentRecord, FormatError> {
    let RawCondition {
        name,
        rows,
        metadata: raw_metadata,
    } = condition;

    if rows.is_empty() && !schema.allow_empty_conditions {
        return Err(FormatError::EmptyCondition { condition: name });
    }

    let mut coordinates = Vec::with_capacity(rows.len());
    for (row_idx, row) in rows.iter().enumerate() {
        coordinates.push(parse_row(schema, &name, row_idx, row)?);
    }

    let mut metadata = BTreeMap::new();
    for (field, kind) in schema.required_metadata {
        let raw = raw_metadata
            .get(*field)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| FormatError::MissingMetadata {
                condition: name.clone(),
                field: (*field).to_string(),
            })?;
        let value = kind
            .parse(field, raw)
            .map_err(|source| FormatError::InvalidMetadata {
                condition: name.clone(),
                source,
            })?;
        metadata.insert((*field).to_string(), value);
    }
    for (field, raw) in raw_metadata {
        if raw.is_empty() || metadata.contains_key(&field) {
            continue;
        }
        metadata.insert(field, MetadataValue::String(raw));
    }

    Ok(ExperimentRecord::new(name, coordinates, metadata))
}

fn parse_row(
    schema: &DatasetSchema,
    condition: &str,
    row_idx: usize,
    row: &[String],
) -> Result<Tristimulus, FormatError> {
    if row.len() != ROW_WIDTH {
        return Err(FormatError::RowWidth {
            condition: condition.to_string(),
            row: row_idx + 1,
            expected: ROW_WIDTH,
            found: row.len(),
        });
    }
    let mut values = [0.0; ROW_WIDTH];
    for (slot, token) in values.iter_mut().zip(row) {
        let value = token
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| FormatError::InvalidNumber {
                condition: condition.to_string(),
                row: row_idx + 1,
                value: token.clone(),
            })?;
        *slot = value * schema.scale;
    }
    Ok(values)
}
