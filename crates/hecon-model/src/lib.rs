//! Shared data model for hospital discharge analytics.
//!
//! Entity types passed between the ingest, anonymize, analytics and report
//! crates. Everything here is plain data apart from label folding in
//! [`text`]; behavior lives in the consuming crates.

pub mod alert;
pub mod anonymized;
pub mod bucket;
pub mod period;
pub mod record;
pub mod segment;
pub mod text;
pub mod trend;
pub mod warning;

pub use alert::{Alert, AlertCategory, Severity, Tier};
pub use anonymized::{AnonymizedField, AnonymizedRecord, Technique};
pub use bucket::{AggregateBucket, BucketMetric};
pub use period::{Granularity, Period};
pub use record::{MAX_PLAUSIBLE_AGE, Record, Sex};
pub use segment::{ClusterLabel, Segment};
pub use text::fold_upper;
pub use trend::TrendModel;
pub use warning::{ColumnWarnings, ParseWarningKind, ParseWarnings};
