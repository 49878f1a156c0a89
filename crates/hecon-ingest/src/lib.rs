//! Hospital discharge record ingestion.
//!
//! Loads a delimited extract, validates it against an explicit
//! [`SchemaMapping`] and normalizes every row into a [`hecon_model::Record`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use hecon_ingest::{SchemaMapping, load_records};
//!
//! let batch = load_records(Path::new("egresos.csv"), &SchemaMapping::default())?;
//! println!("{} records, {} parse warnings", batch.len(), batch.warnings.total());
//! # Ok::<(), hecon_ingest::IngestError>(())
//! ```

mod error;
mod normalize;
mod schema;
mod table;

use std::path::Path;

pub use error::{IngestError, Result};
pub use normalize::{
    NormalizedBatch, normalize, parse_amount, parse_date, parse_f64, parse_sex, parse_timestamp,
};
pub use schema::{ColumnSpec, FieldRole, ResolvedSchema, SchemaMapping};
pub use table::{CsvTable, read_csv_table};

/// Reads `path` and normalizes it in one step.
///
/// # Errors
///
/// Fails on IO or CSV syntax errors and when a required column is missing.
pub fn load_records(path: &Path, mapping: &SchemaMapping) -> Result<NormalizedBatch> {
    let table = read_csv_table(path)?;
    normalize(&table, mapping)
}
