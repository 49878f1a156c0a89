//! Record-to-dataset anonymization.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use hecon_model::{AnonymizedField, AnonymizedRecord, Record, Technique};
use serde::Serialize;

use crate::error::{AnonymizeError, Result};
use crate::generalize::{age_group, location_zone, period_label, postal_zone};
use crate::hash::{hash_identifier, placeholder_token};
use crate::policy::{AnonymizationPolicy, Step};
use crate::report::{ComplianceReport, SkippedStep};
use crate::validate::validate_dataset;

/// Anonymized rows with their output column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnonymizedDataset {
    pub columns: Vec<String>,
    pub records: Vec<AnonymizedRecord>,
}

impl AnonymizedDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// What happens to one source column.
#[derive(Debug, Clone)]
pub(crate) struct ColumnPlan {
    pub(crate) source: String,
    pub(crate) output: Option<String>,
    pub(crate) step: Step,
    /// False for columns that matched no policy list.
    pub(crate) listed: bool,
}

/// Applies an [`AnonymizationPolicy`] with a fixed salt.
///
/// The anonymizer holds no per-call state; the same instance can process any
/// number of batches.
#[derive(Debug, Clone)]
pub struct Anonymizer {
    policy: AnonymizationPolicy,
    salt: String,
}

impl Anonymizer {
    /// # Errors
    ///
    /// Fails on an empty salt or an inconsistent policy.
    pub fn new(policy: AnonymizationPolicy, salt: impl Into<String>) -> Result<Self> {
        let salt = salt.into();
        if salt.trim().is_empty() {
            return Err(AnonymizeError::EmptySalt);
        }
        policy.validate()?;
        Ok(Self { policy, salt })
    }

    pub fn policy(&self) -> &AnonymizationPolicy {
        &self.policy
    }

    /// Anonymizes records using the columns observed in their attributes.
    pub fn anonymize(&self, records: &[Record]) -> (AnonymizedDataset, ComplianceReport) {
        let mut observed = BTreeSet::new();
        for record in records {
            observed.extend(record.attributes.keys().cloned());
        }
        let columns: Vec<String> = observed.into_iter().collect();
        self.anonymize_columns(&columns, records)
    }

    /// Anonymizes records whose source columns are `source_columns`, in order.
    ///
    /// Output columns keep the source order, with each transformed column
    /// renamed in place.
    pub fn anonymize_columns(
        &self,
        source_columns: &[String],
        records: &[Record],
    ) -> (AnonymizedDataset, ComplianceReport) {
        let start = Instant::now();
        let plan = self.plan(source_columns);
        let skipped = self.skipped_steps(source_columns);
        for step in &skipped {
            tracing::debug!(step = step.step, column = %step.column, "column absent, step skipped");
        }

        let mut placeholders = 0usize;
        let rows: Vec<AnonymizedRecord> = records
            .iter()
            .map(|record| {
                let mut fields = BTreeMap::new();
                for entry in &plan {
                    let Some(output) = &entry.output else {
                        continue;
                    };
                    let field = self.transform(entry, record);
                    if field.technique == Technique::Placeholder {
                        placeholders += 1;
                    }
                    fields.insert(output.clone(), field);
                }
                AnonymizedRecord::new(fields)
            })
            .collect();

        let dataset = AnonymizedDataset {
            columns: plan.iter().filter_map(|entry| entry.output.clone()).collect(),
            records: rows,
        };
        let validation = validate_dataset(&dataset);
        let report = ComplianceReport::build(
            &plan,
            skipped,
            validation,
            records.len(),
            placeholders,
            self.policy.granularity,
        );

        tracing::info!(
            records = report.statistics.records_processed,
            deleted = report.statistics.fields_deleted,
            hashed = report.statistics.fields_hashed,
            generalized = report.statistics.fields_generalized,
            placeholders,
            duration_ms = start.elapsed().as_millis(),
            "records anonymized"
        );
        (dataset, report)
    }

    fn plan(&self, source_columns: &[String]) -> Vec<ColumnPlan> {
        source_columns
            .iter()
            .map(|column| {
                let (step, listed) = match self.policy.step_for(column) {
                    Some(step) => (step, true),
                    None if self.policy.drop_unlisted => (Step::Delete, false),
                    None => (Step::Retain, false),
                };
                ColumnPlan {
                    source: column.clone(),
                    output: step.output_column(column),
                    step,
                    listed,
                }
            })
            .collect()
    }

    fn skipped_steps(&self, source_columns: &[String]) -> Vec<SkippedStep> {
        self.policy
            .steps()
            .into_iter()
            .filter(|(_, step)| *step != Step::Retain)
            .filter(|(column, _)| {
                !source_columns
                    .iter()
                    .any(|source| source.eq_ignore_ascii_case(column))
            })
            .map(|(column, step)| SkippedStep {
                step: step.as_str(),
                column: column.to_string(),
            })
            .collect()
    }

    fn transform(&self, entry: &ColumnPlan, record: &Record) -> AnonymizedField {
        let raw = record.attribute(&entry.source);
        let (technique, value) = match entry.step {
            Step::Hash => match raw {
                Some(value) => (Technique::Hashed, hash_identifier(value, &self.salt)),
                None => (Technique::Placeholder, placeholder_token()),
            },
            Step::AgeGroup => (
                Technique::Generalized,
                age_group(record.age.map(f64::from)).to_string(),
            ),
            Step::Zone => (Technique::Generalized, location_zone(raw).to_string()),
            Step::Period => (
                Technique::Generalized,
                period_label(raw, self.policy.granularity),
            ),
            Step::PostalCode => (Technique::Generalized, postal_zone(raw)),
            Step::Retain | Step::Delete => {
                (Technique::Retained, raw.unwrap_or_default().to_string())
            }
        };
        AnonymizedField { technique, value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(cells: &[(&str, &str)]) -> Record {
        Record {
            attributes: cells
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            ..Record::default()
        }
    }

    #[test]
    fn empty_salt_is_rejected() {
        let err = Anonymizer::new(AnonymizationPolicy::default(), "  ").unwrap_err();
        assert!(matches!(err, AnonymizeError::EmptySalt));
    }

    #[test]
    fn columns_keep_source_order() {
        let anonymizer = Anonymizer::new(AnonymizationPolicy::default(), "s").unwrap();
        let columns: Vec<String> = ["nombre_paciente", "n_expediente_hosp", "estado", "gasto_nivel_6"]
            .iter()
            .map(|c| (*c).to_string())
            .collect();
        let rows = [record(&[("n_expediente_hosp", "77"), ("estado", "CDMX"), ("gasto_nivel_6", "10")])];
        let (dataset, _) = anonymizer.anonymize_columns(&columns, &rows);
        assert_eq!(
            dataset.columns,
            vec!["n_expediente_hosp_hash", "estado_zone", "gasto_nivel_6"]
        );
        assert_eq!(dataset.records[0].value("estado_zone"), Some("ZONA_METROPOLITANA"));
        assert_eq!(dataset.records[0].value("gasto_nivel_6"), Some("10"));
    }

    #[test]
    fn missing_identifier_gets_placeholder() {
        let anonymizer = Anonymizer::new(AnonymizationPolicy::default(), "s").unwrap();
        let columns = vec!["n_expediente_hosp".to_string()];
        let rows = [record(&[]), record(&[("n_expediente_hosp", "1")])];
        let (dataset, report) = anonymizer.anonymize_columns(&columns, &rows);
        let first = dataset.records[0].get("n_expediente_hosp_hash").unwrap();
        assert_eq!(first.technique, Technique::Placeholder);
        assert!(first.value.starts_with("ANON_"));
        let second = dataset.records[1].get("n_expediente_hosp_hash").unwrap();
        assert_eq!(second.technique, Technique::Hashed);
        assert_eq!(report.statistics.placeholders_issued, 1);
    }

    #[test]
    fn unlisted_columns_follow_policy() {
        let columns = vec!["observaciones".to_string()];
        let rows = [record(&[("observaciones", "texto libre")])];

        let keep = Anonymizer::new(AnonymizationPolicy::default(), "s").unwrap();
        let (dataset, _) = keep.anonymize_columns(&columns, &rows);
        assert_eq!(dataset.columns, vec!["observaciones"]);

        let policy = AnonymizationPolicy {
            drop_unlisted: true,
            ..AnonymizationPolicy::default()
        };
        let drop = Anonymizer::new(policy, "s").unwrap();
        let (dataset, report) = drop.anonymize_columns(&columns, &rows);
        assert!(dataset.columns.is_empty());
        assert_eq!(report.statistics.fields_deleted, 1);
    }
}
