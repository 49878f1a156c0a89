//! Irreversible de-identification of hospital discharge records.
//!
//! An [`Anonymizer`] applies an [`AnonymizationPolicy`]: direct identifiers
//! are deleted, unique identifiers are replaced by salted SHA-256 digests,
//! quasi-identifiers (age, location, dates, postal code) are generalized and
//! analytic fields are retained. Each run yields a [`ComplianceReport`].
//!
//! Nothing in this crate maps an output value back to its input.

mod anonymizer;
mod error;
mod generalize;
mod hash;
mod policy;
mod report;
mod validate;
mod writer;

pub use anonymizer::{AnonymizedDataset, Anonymizer};
pub use error::{AnonymizeError, Result};
pub use generalize::{INVALID, UNSPECIFIED, age_group, location_zone, period_label, postal_zone};
pub use hash::{HASH_PREFIX, PLACEHOLDER_PREFIX, hash_identifier, placeholder_token, sha256_hex};
pub use policy::AnonymizationPolicy;
pub use report::{
    ComplianceReport, ComplianceStatistics, HASH_METHOD, REPORT_VERSION, SkippedStep, TECHNIQUES,
    TouchedFields,
};
pub use validate::{ValidationOutcome, looks_like_identifier, validate_dataset};
pub use writer::write_csv;
