//! Breneman (1987) corresponding chromaticities.
//!
//! Raw layout: `experiments.txt` lists one table file per line. Each table
//! is a whitespace-delimited block of `Y u' v'` rows preceded by
//! `# Name:`, `# Illuminant:` and `# Luminance:` header lines. Other
//! comment lines are ignored. Listed names must stay inside the dataset
//! directory.
//!
//! No raw files ship with the crate. The default source reads them from
//! [`datasets_root`](crate::paths::datasets_root).

#![deny(unsafe_code)]

use std::sync::Arc;

use colour_model::{MetadataKind, RecordMap};

use crate::cache::build;
use crate::error::{DatasetError, FormatError, Result};
use crate::loader::{DatasetLoader, LoadState};
use crate::parse::{DatasetSchema, RawCondition, parse_records};
use crate::paths::is_contained;
use crate::source::{RawDataSource, read_text};
use crate::tokenize::{read_listing, read_whitespace_block};

const LISTING_FILE: &str = "experiments.txt";
const NAME_HEADER: &str = "Name";
/// Describes the row layout only; not carried as metadata.
const COLUMNS_HEADER: &str = "Columns";

const SCHEMA: DatasetSchema = DatasetSchema {
    scale: 1.0,
    required_metadata: &[
        ("Illuminant", MetadataKind::String),
        ("Luminance", MetadataKind::Float),
    ],
    allow_empty_conditions: false,
    expected_conditions: Some(12),
};

/// Loader for the Breneman (1987) corresponding-chromaticity experiments.
#[derive(Debug, Default)]
pub struct Breneman1987DatasetLoader {
    state: LoadState,
}

impl Breneman1987DatasetLoader {
    pub fn with_source(source: Arc<dyn RawDataSource>) -> Self {
        Self {
            state: LoadState::new(source),
        }
    }
}

impl DatasetLoader for Breneman1987DatasetLoader {
    const ID: &'static str = "10.1364/JOSAA.4.001115";
    const NAME: &'static str = "Breneman 1987";

    fn state(&self) -> &LoadState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut LoadState {
        &mut self.state
    }

    fn parse(source: &dyn RawDataSource) -> Result<RecordMap> {
        let listing = read_text(source, Self::ID, LISTING_FILE)?;
        let format = |e| DatasetError::format(Self::ID, e);

        let files = read_listing(&listing);
        if let Some(file) = files.iter().find(|file| !is_contained(file)) {
            let message = format!("entry '{file}' escapes the dataset directory");
            return Err(format(FormatError::layout(LISTING_FILE, message)));
        }

        let mut raw = Vec::new();
        for file in files {
            let text = read_text(source, Self::ID, &file)?;
            raw.push(tokenize_experiment(&file, &text).map_err(format)?);
        }
        parse_records(&SCHEMA, raw).map_err(format)
    }
}

/// Returns the process-wide Breneman 1987 loader, loading it on first use.
pub fn build_breneman1987() -> Result<&'static Breneman1987DatasetLoader> {
    build::<Breneman1987DatasetLoader>()
}

fn tokenize_experiment(file: &str, text: &str) -> std::result::Result<RawCondition, FormatError> {
    let mut block = read_whitespace_block(text);
    let name = block
        .headers
        .remove(NAME_HEADER)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| FormatError::layout(file, format!("missing '# {NAME_HEADER}:' header")))?;
    block.headers.remove(COLUMNS_HEADER);

    let mut condition = RawCondition::new(name);
    condition.rows = block.rows;
    condition.metadata = block.headers;
    Ok(condition)
}
