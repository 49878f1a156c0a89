//! Row normalization into canonical records.
//!
//! Each cell is coerced on its own. A cell that fails coercion becomes `None`
//! and is counted in [`ParseWarnings`] against its source column; the batch
//! always completes once the schema has resolved.

mod datetime;
mod numeric;

pub use datetime::{parse_date, parse_timestamp};
pub use numeric::{parse_amount, parse_f64};

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::NaiveDateTime;
use hecon_model::{MAX_PLAUSIBLE_AGE, ParseWarningKind, ParseWarnings, Record, Sex};

use crate::error::Result;
use crate::schema::{FieldRole, ResolvedSchema, SchemaMapping};
use crate::table::CsvTable;

/// Records produced from one table plus the coercion failures met on the way.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub records: Vec<Record>,
    pub warnings: ParseWarnings,
    /// Optional roles whose column was absent from the input.
    pub missing_optional: Vec<FieldRole>,
}

impl NormalizedBatch {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Normalizes every row of `table` through `mapping`.
///
/// # Errors
///
/// Returns [`crate::IngestError::Schema`] when a required column is missing.
pub fn normalize(table: &CsvTable, mapping: &SchemaMapping) -> Result<NormalizedBatch> {
    let start = Instant::now();
    let resolved = mapping.resolve(&table.headers)?;
    for role in resolved.missing_optional() {
        tracing::debug!(
            role = %role,
            column = %mapping.spec(*role).column,
            "optional column absent, dependent features skipped"
        );
    }

    let mut warnings = ParseWarnings::default();
    let records: Vec<Record> = table
        .rows
        .iter()
        .map(|row| {
            let mut cells = RowCells {
                headers: &table.headers,
                row,
                resolved: &resolved,
                warnings: &mut warnings,
            };
            cells.build_record()
        })
        .collect();

    for (column, counts) in warnings.iter() {
        tracing::warn!(
            column,
            unparseable = counts.unparseable,
            out_of_range = counts.out_of_range,
            "cells coerced to null"
        );
    }
    tracing::info!(
        records = records.len(),
        parse_warnings = warnings.total(),
        duration_ms = start.elapsed().as_millis(),
        "records normalized"
    );

    Ok(NormalizedBatch {
        records,
        warnings,
        missing_optional: resolved.missing_optional().to_vec(),
    })
}

/// Coerces a sex cell. Returns `None` for values that are not a known spelling.
pub fn parse_sex(value: &str) -> Option<Sex> {
    match value.trim().to_uppercase().as_str() {
        "MASCULINO" | "M" | "HOMBRE" | "H" | "MALE" => Some(Sex::Male),
        "FEMENINO" | "F" | "MUJER" | "FEMALE" => Some(Sex::Female),
        _ => None,
    }
}

/// Cell accessor for one row, recording warnings under the source column name.
struct RowCells<'a> {
    headers: &'a [String],
    row: &'a [String],
    resolved: &'a ResolvedSchema,
    warnings: &'a mut ParseWarnings,
}

impl RowCells<'_> {
    fn build_record(&mut self) -> Record {
        let admitted_at = self.timestamp(FieldRole::AdmittedAt);
        let discharged_at = self.timestamp(FieldRole::DischargedAt);
        let stay_days = self.stay_days();
        let length_of_stay = match (admitted_at, discharged_at) {
            (Some(admitted), Some(discharged)) => {
                let days = (discharged - admitted).num_days();
                if days >= 0 { Some(days) } else { stay_days }
            }
            _ => stay_days,
        };

        let attributes: BTreeMap<String, String> = self
            .headers
            .iter()
            .zip(self.row.iter())
            .filter(|(_, value)| !value.is_empty())
            .map(|(header, value)| (header.clone(), value.clone()))
            .collect();

        Record {
            patient_id: self.text(FieldRole::PatientId),
            admission_id: self.text(FieldRole::AdmissionId),
            age: self.age(),
            sex: self.sex(),
            admitted_at,
            discharged_at,
            closed_at: self.timestamp(FieldRole::ClosedAt),
            billed_cost: self.cost(FieldRole::BilledCost),
            direct_cost: self.cost(FieldRole::DirectCost),
            length_of_stay,
            discharge_reason: self.text(FieldRole::DischargeReason),
            service: self.text(FieldRole::Service),
            region: self.text(FieldRole::Region),
            state: self.text(FieldRole::State),
            attributes,
        }
    }

    /// Non-empty cell for a role.
    fn cell(&self, role: FieldRole) -> Option<&str> {
        let index = self.resolved.index(role)?;
        let value = self.row.get(index)?.as_str();
        (!value.is_empty()).then_some(value)
    }

    fn warn(&mut self, role: FieldRole, kind: ParseWarningKind) {
        if let Some(index) = self.resolved.index(role) {
            self.warnings.record(&self.headers[index], kind);
        }
    }

    fn text(&self, role: FieldRole) -> Option<String> {
        self.cell(role).map(str::to_string)
    }

    fn age(&mut self) -> Option<u8> {
        let raw = self.cell(FieldRole::Age)?;
        let Some(value) = parse_f64(raw) else {
            self.warn(FieldRole::Age, ParseWarningKind::Unparseable);
            return None;
        };
        let years = value.trunc();
        if years < 0.0 || years > f64::from(MAX_PLAUSIBLE_AGE) {
            self.warn(FieldRole::Age, ParseWarningKind::OutOfRange);
            return None;
        }
        Some(years as u8)
    }

    fn sex(&mut self) -> Sex {
        let Some(raw) = self.cell(FieldRole::Sex) else {
            return Sex::Unspecified;
        };
        match parse_sex(raw) {
            Some(sex) => sex,
            None => {
                self.warn(FieldRole::Sex, ParseWarningKind::Unparseable);
                Sex::Unspecified
            }
        }
    }

    fn cost(&mut self, role: FieldRole) -> Option<f64> {
        let raw = self.cell(role)?;
        match parse_amount(raw) {
            Some(amount) if amount >= 0.0 => Some(amount),
            Some(_) => {
                self.warn(role, ParseWarningKind::OutOfRange);
                None
            }
            None => {
                self.warn(role, ParseWarningKind::Unparseable);
                None
            }
        }
    }

    fn timestamp(&mut self, role: FieldRole) -> Option<NaiveDateTime> {
        let raw = self.cell(role)?;
        let parsed = parse_timestamp(raw);
        if parsed.is_none() {
            self.warn(role, ParseWarningKind::Unparseable);
        }
        parsed
    }

    fn stay_days(&mut self) -> Option<i64> {
        let raw = self.cell(FieldRole::StayDays)?;
        match parse_f64(raw) {
            Some(days) if days >= 0.0 => Some(days.trunc() as i64),
            Some(_) => {
                self.warn(FieldRole::StayDays, ParseWarningKind::OutOfRange);
                None
            }
            None => {
                self.warn(FieldRole::StayDays, ParseWarningKind::Unparseable);
                None
            }
        }
    }
}
