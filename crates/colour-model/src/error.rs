use thiserror::Error;

/// Errors raised while assembling records.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("duplicate record name '{name}'")]
    DuplicateRecord { name: String },

    #[error("invalid {kind} value '{value}' for metadata field '{field}'")]
    InvalidMetadata {
        field: String,
        kind: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, RecordError>;
