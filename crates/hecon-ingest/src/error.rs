//! Error types for record ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort loading a batch.
///
/// Cell-level coercion failures are not errors; they are counted in
/// [`hecon_model::ParseWarnings`].
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Failed to open or read the input file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// The delimited text could not be tokenized.
    #[error("failed to parse CSV {path}: {source}")]
    CsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The input has no header row.
    #[error("CSV input has no header row: {path}")]
    EmptyCsv { path: PathBuf },

    // === Schema Errors ===
    /// A column required by the schema mapping is absent from the input.
    #[error("schema error: required column '{column}' not found")]
    Schema { column: String },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
