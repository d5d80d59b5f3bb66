//! Raw association tables.
//!
//! The partitioner only sees [`TabularSource::cells`]: a flat list of
//! `(row_id, col_id, value)` triples in row-major order. [`RawTable`] is the
//! in-memory implementation; it can be loaded from a CSV matrix whose header
//! row holds the column ids and whose first column holds the row ids:
//!
//! ```text
//! ,A,B,C
//! A,.,apple,ace
//! B,banana,.,bicycle
//! ```

use std::io::Read;
use std::path::Path;

use tracing::debug;

use crate::drill_engine::error::Result;

/// One cell of a two-dimensional association table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub row_id: String,
    pub col_id: String,
    /// `None` for a blank cell.
    pub value: Option<String>,
}

/// Anything that can be flattened into association cells.
pub trait TabularSource {
    /// Every cell, row-major.
    fn cells(&self) -> Vec<Cell>;
}

/// A rectangular grid of optional values labelled by row and column ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    col_ids: Vec<String>,
    rows: Vec<(String, Vec<Option<String>>)>,
}

impl RawTable {
    pub fn new(col_ids: Vec<String>) -> Self {
        RawTable { col_ids, rows: Vec::new() }
    }

    /// Append a row. Short rows are padded with blanks, long rows truncated.
    pub fn push_row(&mut self, row_id: impl Into<String>, mut values: Vec<Option<String>>) {
        values.resize(self.col_ids.len(), None);
        self.rows.push((row_id.into(), values));
    }

    /// Convenience for literals: empty strings become blanks.
    pub fn with_row(mut self, row_id: &str, values: &[&str]) -> Self {
        let values = values
            .iter()
            .map(|v| if v.is_empty() { None } else { Some(v.to_string()) })
            .collect();
        self.push_row(row_id, values);
        self
    }

    pub fn col_ids(&self) -> &[String] {
        &self.col_ids
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Parse a CSV matrix. Rows with a blank row id are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let col_ids: Vec<String> = reader
            .headers()?
            .iter()
            .skip(1)
            .map(|h| h.trim().to_string())
            .collect();
        let mut table = RawTable::new(col_ids);

        for (row_idx, record) in reader.records().enumerate() {
            let record = record?;
            let row_id = record.get(0).map(str::trim).unwrap_or_default();
            if row_id.is_empty() {
                debug!(row = row_idx + 1, "Skipping table row without a row id");
                continue;
            }
            let values = record
                .iter()
                .skip(1)
                .map(|v| {
                    let v = v.trim();
                    if v.is_empty() { None } else { Some(v.to_string()) }
                })
                .collect();
            table.push_row(row_id, values);
        }

        Ok(table)
    }

    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }
}

impl TabularSource for RawTable {
    fn cells(&self) -> Vec<Cell> {
        self.rows
            .iter()
            .flat_map(|(row_id, values)| {
                self.col_ids.iter().zip(values).map(move |(col_id, value)| Cell {
                    row_id: row_id.clone(),
                    col_id: col_id.clone(),
                    value: value.clone(),
                })
            })
            .collect()
    }
}
