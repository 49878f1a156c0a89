//! Error types for metrics output.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    // === Serialization Errors ===
    #[error("failed to serialize metrics: {0}")]
    Serialize(#[from] serde_json::Error),

    // === I/O Errors ===
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
