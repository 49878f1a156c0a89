//! Delimited text loading into a raw table.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::error::{IngestError, Result};

/// Raw table: trimmed header names and rows padded to the header width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Reads a table from any reader. `origin` is only used in error messages.
    pub fn from_reader<R: Read>(reader: R, origin: &Path) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);
        let mut headers: Option<Vec<String>> = None;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|source| IngestError::CsvParse {
                path: origin.to_path_buf(),
                source,
            })?;
            let cells: Vec<String> = record.iter().map(normalize_cell).collect();
            if cells.iter().all(String::is_empty) {
                continue;
            }
            match &headers {
                None => headers = Some(cells.iter().map(|cell| normalize_header(cell)).collect()),
                Some(header) => {
                    let mut row = Vec::with_capacity(header.len());
                    for idx in 0..header.len() {
                        row.push(cells.get(idx).cloned().unwrap_or_default());
                    }
                    rows.push(row);
                }
            }
        }
        let headers = headers.ok_or_else(|| IngestError::EmptyCsv {
            path: origin.to_path_buf(),
        })?;
        Ok(Self { headers, rows })
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads a UTF-8 CSV file. The first non-blank row is the header.
pub fn read_csv_table(path: &Path) -> Result<CsvTable> {
    let file = File::open(path).map_err(|source| IngestError::FileRead {
        path: PathBuf::from(path),
        source,
    })?;
    let table = CsvTable::from_reader(file, path)?;
    tracing::debug!(
        path = %path.display(),
        columns = table.headers.len(),
        rows = table.rows.len(),
        "csv table loaded"
    );
    Ok(table)
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}
