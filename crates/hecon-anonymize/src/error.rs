//! Error types for anonymization.

use thiserror::Error;

/// Errors raised while configuring the anonymizer or writing its output.
///
/// Transforms themselves never fail; every cell has a fallback value.
#[derive(Debug, Error)]
pub enum AnonymizeError {
    // === Policy Errors ===
    /// Hashing without a salt would make identifiers guessable by dictionary.
    #[error("anonymization salt must not be empty")]
    EmptySalt,

    /// A column is claimed by two transforms.
    #[error("column '{column}' is listed for both {first} and {second}")]
    PolicyConflict {
        column: String,
        first: &'static str,
        second: &'static str,
    },

    /// Day-level periods keep the exact date and defeat generalization.
    #[error("period granularity must be month, quarter or year, got '{0}'")]
    PeriodTooFine(&'static str),

    // === Output Errors ===
    /// Failed to write the anonymized CSV.
    #[error("failed to write anonymized CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to flush the output stream.
    #[error("failed to write anonymized output: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for anonymization operations.
pub type Result<T> = std::result::Result<T, AnonymizeError>;
