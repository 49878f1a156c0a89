//! Compliance report describing what the anonymizer did.

use hecon_model::Granularity;
use serde::Serialize;

use crate::anonymizer::ColumnPlan;
use crate::policy::Step;
use crate::validate::ValidationOutcome;

pub const REPORT_VERSION: &str = "2.0";

pub const HASH_METHOD: &str =
    "SHA-256 over value and salt, full digest as upper-case hex with HASH_ prefix";

/// Technique classes in the order they are applied.
pub const TECHNIQUES: &[&str] = &[
    "deletion of direct identifiers",
    "salted one-way hashing of unique identifiers",
    "age generalization into bands",
    "geographic generalization into zones",
    "temporal generalization into periods",
    "postal code truncation",
    "retention of analytic fields",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComplianceStatistics {
    pub records_processed: usize,
    pub fields_deleted: usize,
    pub fields_hashed: usize,
    pub fields_generalized: usize,
    pub fields_retained: usize,
    pub placeholders_issued: usize,
}

/// Source columns touched by each technique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TouchedFields {
    pub deleted: Vec<String>,
    pub hashed: Vec<String>,
    pub generalized: Vec<String>,
    pub retained: Vec<String>,
}

/// A configured step whose column was absent from the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedStep {
    pub step: &'static str,
    pub column: String,
}

/// Versioned statement of the anonymization applied to one batch.
///
/// Contains no timestamps; the same policy over the same columns and row
/// count always yields the same report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplianceReport {
    pub version: &'static str,
    pub hash_method: &'static str,
    pub period_granularity: Granularity,
    pub techniques: Vec<&'static str>,
    pub statistics: ComplianceStatistics,
    pub fields: TouchedFields,
    pub skipped_steps: Vec<SkippedStep>,
    pub validation: ValidationOutcome,
    pub warnings: Vec<String>,
}

impl ComplianceReport {
    pub(crate) fn build(
        plan: &[ColumnPlan],
        skipped_steps: Vec<SkippedStep>,
        validation: ValidationOutcome,
        records_processed: usize,
        placeholders_issued: usize,
        period_granularity: Granularity,
    ) -> Self {
        let mut fields = TouchedFields::default();
        for entry in plan {
            let bucket = match entry.step {
                Step::Delete => &mut fields.deleted,
                Step::Hash => &mut fields.hashed,
                Step::AgeGroup | Step::Zone | Step::Period | Step::PostalCode => {
                    &mut fields.generalized
                }
                Step::Retain => &mut fields.retained,
            };
            bucket.push(entry.source.clone());
        }
        let unlisted_dropped = plan
            .iter()
            .filter(|entry| !entry.listed && entry.step == Step::Delete)
            .count();

        let mut warnings: Vec<String> = validation
            .suspicious_fields
            .iter()
            .map(|column| format!("column '{column}' may contain a direct identifier"))
            .collect();
        if unlisted_dropped > 0 {
            warnings.push(format!(
                "{unlisted_dropped} unlisted column(s) dropped by policy"
            ));
        }

        Self {
            version: REPORT_VERSION,
            hash_method: HASH_METHOD,
            period_granularity,
            techniques: TECHNIQUES.to_vec(),
            statistics: ComplianceStatistics {
                records_processed,
                fields_deleted: fields.deleted.len(),
                fields_hashed: fields.hashed.len(),
                fields_generalized: fields.generalized.len(),
                fields_retained: fields.retained.len(),
                placeholders_issued,
            },
            fields,
            skipped_steps,
            validation,
            warnings,
        }
    }

    /// True when validation found nothing suspicious.
    pub fn is_clean(&self) -> bool {
        self.validation.clean
    }
}
