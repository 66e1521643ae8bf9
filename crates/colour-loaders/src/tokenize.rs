//! Shared tokenizers for raw dataset tables.
//!
//! These only split text into cells; what the cells mean is decided by the
//! per-dataset loaders and [`crate::parse`].

#![deny(unsafe_code)]

use std::collections::BTreeMap;

use csv::ReaderBuilder;

use crate::error::FormatError;

/// A headed CSV table with trimmed cells.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Index of the column named `name`.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like [`CsvTable::column`], but a missing column is a layout error.
    pub fn require_column(&self, file: &str, name: &str) -> Result<usize, FormatError> {
        self.column(name)
            .ok_or_else(|| FormatError::layout(file, format!("missing column '{name}'")))
    }
}

/// Parse CSV text with a header row.
///
/// Strips a leading BOM from header names and trims surrounding whitespace
/// from every cell. Rows must all have the header's width.
pub fn read_csv_table(file: &str, text: &str) -> Result<CsvTable, FormatError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FormatError::csv(file, &e))?
        .iter()
        .map(|h| h.trim_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| FormatError::csv(file, &e))?;
        rows.push(record.iter().map(|v| v.trim().to_string()).collect());
    }
    Ok(CsvTable { headers, rows })
}

/// A whitespace-delimited numeric block with `#` header lines.
#[derive(Debug, Clone, Default)]
pub struct WhitespaceBlock {
    /// `# Key: value` header lines.
    pub headers: BTreeMap<String, String>,
    /// Data lines split on whitespace, in file order.
    pub rows: Vec<Vec<String>>,
}

/// Split a whitespace-delimited table.
///
/// Lines starting with `#` are comments; a comment of the form
/// `# Key: value` is also recorded as a header. Blank lines are skipped.
pub fn read_whitespace_block(text: &str) -> WhitespaceBlock {
    let mut block = WhitespaceBlock::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if let Some((key, value)) = comment.split_once(':') {
                block
                    .headers
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
            continue;
        }
        block
            .rows
            .push(line.split_whitespace().map(str::to_string).collect());
    }
    block
}

/// Non-comment, non-blank lines of a listing file.
pub fn read_listing(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
