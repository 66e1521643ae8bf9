//! Scalar metadata values attached to experiment records.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{RecordError, Result};

/// A single metadata cell.
///
/// Dataset schemas declare which fields they publish and with which
/// [`MetadataKind`]; values are strings, floats or integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    String(String),
    Integer(i64),
    Float(f64),
}

impl MetadataValue {
    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Interprets numeric values as `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetadataValue::Float(v) => Some(*v),
            MetadataValue::Integer(i) => Some(*i as f64),
            MetadataValue::String(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetadataValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn kind(&self) -> MetadataKind {
        match self {
            MetadataValue::String(_) => MetadataKind::String,
            MetadataValue::Integer(_) => MetadataKind::Integer,
            MetadataValue::Float(_) => MetadataKind::Float,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataValue::String(s) => write!(f, "{s}"),
            MetadataValue::Integer(i) => write!(f, "{i}"),
            MetadataValue::Float(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        MetadataValue::String(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        MetadataValue::String(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        MetadataValue::Integer(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        MetadataValue::Float(value)
    }
}

/// Kind tag a dataset schema declares for one metadata field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataKind {
    String,
    Float,
    Integer,
}

impl MetadataKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetadataKind::String => "string",
            MetadataKind::Float => "float",
            MetadataKind::Integer => "integer",
        }
    }

    /// Converts one raw text cell into a value of this kind.
    ///
    /// Surrounding whitespace is ignored for numeric kinds; string values
    /// are kept exactly as published. Floats must be finite.
    pub fn parse(&self, field: &str, raw: &str) -> Result<MetadataValue> {
        let invalid = || RecordError::InvalidMetadata {
            field: field.to_string(),
            kind: self.as_str(),
            value: raw.to_string(),
        };
        match self {
            MetadataKind::String => Ok(MetadataValue::String(raw.to_string())),
            MetadataKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(MetadataValue::Integer)
                .map_err(|_| invalid()),
            MetadataKind::Float => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(MetadataValue::Float)
                .ok_or_else(invalid),
        }
    }
}

impl fmt::Display for MetadataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
