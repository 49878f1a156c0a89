//! Column lists driving each anonymization technique.

use hecon_model::Granularity;
use serde::{Deserialize, Serialize};

use crate::error::{AnonymizeError, Result};

/// Which columns are deleted, hashed, generalized or retained.
///
/// Defaults describe the hospital discharge summary export. Every list can be
/// replaced from the `[anonymize]` table of the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnonymizationPolicy {
    /// Direct identifiers removed entirely.
    pub delete: Vec<String>,
    /// Unique identifiers replaced by `<column>_hash`.
    pub hash: Vec<String>,
    /// Age column replaced by `<column>_grupo`.
    pub age_field: String,
    /// Location columns replaced by `<column>_zone`.
    pub location: Vec<String>,
    /// Timestamp columns replaced by `<column>_periodo`.
    pub timestamps: Vec<String>,
    /// Postal code column replaced by `<column>_zone`.
    pub postal_code: String,
    /// Analytic columns passed through unchanged.
    pub retain: Vec<String>,
    /// Unlisted columns whose name contains one of these fragments are hashed.
    pub hash_fragments: Vec<String>,
    /// Unlisted columns whose name contains one of these fragments are
    /// generalized to periods. Hash fragments take precedence.
    pub period_fragments: Vec<String>,
    pub granularity: Granularity,
    /// Remove columns that appear in no list instead of retaining them.
    pub drop_unlisted: bool,
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

impl Default for AnonymizationPolicy {
    fn default() -> Self {
        Self {
            delete: owned(&[
                "nombre_paciente",
                "nombre_paciente_hosp",
                "direcccion",
                "direccion",
                "calle",
                "FYF7Y9IB2I2II_L5JF77Y5J5F1B",
            ]),
            hash: owned(&[
                "id_registro_urg",
                "expediente_urg",
                "id_registro_admision",
                "n_expediente_hosp",
                "ian_expediente_hosp",
            ]),
            age_field: "edad".to_string(),
            location: owned(&["estado", "ciudad", "alcaldia_municipio"]),
            timestamps: owned(&[
                "fecha_recepcion_urg",
                "fecha_egreso_urg",
                "fecha_recepcion_hosp",
                "fecha_egreso_hosp",
                "fecha_egreso_general",
            ]),
            postal_code: "cp".to_string(),
            retain: owned(&[
                "motivo_alta_urg",
                "nse_urg",
                "derechohabiencia",
                "diagnostico_urg",
                "sexo",
                "no_de_cam_urg",
                "hospitalizado_urg",
                "motivo_alta_hosp",
                "nse_hosp",
                "diagnostico_hosp",
                "no_de_cama_hosp",
                "estancia_hosp",
                "dias_hopit",
                "gasto_nivel_6",
                "gasto_nivel_1",
            ]),
            hash_fragments: Vec::new(),
            period_fragments: Vec::new(),
            granularity: Granularity::Month,
            drop_unlisted: false,
        }
    }
}

impl AnonymizationPolicy {
    /// Policy for the per-service detail export: the summary lists plus
    /// name-based rules, since detail extracts carry folio, account and
    /// date columns that vary between exports.
    pub fn detail() -> Self {
        Self {
            hash_fragments: owned(&["folio", "expediente", "id", "numero", "cuenta"]),
            period_fragments: owned(&["fecha"]),
            ..Self::default()
        }
    }
}

/// Name suffixes of every column a transform produces.
pub(crate) const MASKED_SUFFIXES: [&str; 4] = ["_hash", "_zone", "_grupo", "_periodo"];

fn matches_fragment(column: &str, fragments: &[String]) -> bool {
    let lower = column.to_lowercase();
    fragments
        .iter()
        .map(|fragment| fragment.trim().to_lowercase())
        .any(|fragment| !fragment.is_empty() && lower.contains(&fragment))
}

/// Transform assigned to a source column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Delete,
    Hash,
    AgeGroup,
    Zone,
    Period,
    PostalCode,
    Retain,
}

impl Step {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Step::Delete => "deletion",
            Step::Hash => "hashing",
            Step::AgeGroup => "age generalization",
            Step::Zone => "location generalization",
            Step::Period => "period generalization",
            Step::PostalCode => "postal code generalization",
            Step::Retain => "retention",
        }
    }

    /// Output column name for a source column under this step.
    pub(crate) fn output_column(self, column: &str) -> Option<String> {
        match self {
            Step::Delete => None,
            Step::Hash => Some(format!("{column}_hash")),
            Step::AgeGroup => Some(format!("{column}_grupo")),
            Step::Zone | Step::PostalCode => Some(format!("{column}_zone")),
            Step::Period => Some(format!("{column}_periodo")),
            Step::Retain => Some(column.to_string()),
        }
    }
}

impl AnonymizationPolicy {
    /// Every configured column with its step, in precedence order.
    pub(crate) fn steps(&self) -> Vec<(&str, Step)> {
        let mut steps: Vec<(&str, Step)> = Vec::new();
        steps.extend(self.delete.iter().map(|c| (c.as_str(), Step::Delete)));
        steps.extend(self.hash.iter().map(|c| (c.as_str(), Step::Hash)));
        if !self.age_field.trim().is_empty() {
            steps.push((self.age_field.as_str(), Step::AgeGroup));
        }
        steps.extend(self.location.iter().map(|c| (c.as_str(), Step::Zone)));
        steps.extend(self.timestamps.iter().map(|c| (c.as_str(), Step::Period)));
        if !self.postal_code.trim().is_empty() {
            steps.push((self.postal_code.as_str(), Step::PostalCode));
        }
        steps.extend(self.retain.iter().map(|c| (c.as_str(), Step::Retain)));
        steps
    }

    /// Step for a source column (case-insensitive). Explicit lists win over
    /// name fragments.
    pub(crate) fn step_for(&self, column: &str) -> Option<Step> {
        let listed = self
            .steps()
            .into_iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(column))
            .map(|(_, step)| step);
        listed.or_else(|| {
            if matches_fragment(column, &self.hash_fragments) {
                Some(Step::Hash)
            } else if matches_fragment(column, &self.period_fragments) {
                Some(Step::Period)
            } else {
                None
            }
        })
    }

    /// Rejects policies that cannot be applied unambiguously.
    ///
    /// # Errors
    ///
    /// [`AnonymizeError::PolicyConflict`] when a column appears under two
    /// different steps, [`AnonymizeError::PeriodTooFine`] for day granularity.
    pub fn validate(&self) -> Result<()> {
        if self.granularity == Granularity::Day {
            return Err(AnonymizeError::PeriodTooFine(self.granularity.as_str()));
        }
        let steps = self.steps();
        for (idx, (column, step)) in steps.iter().enumerate() {
            if let Some((_, other)) = steps[..idx]
                .iter()
                .find(|(prior, other)| prior.eq_ignore_ascii_case(column) && other != step)
            {
                return Err(AnonymizeError::PolicyConflict {
                    column: (*column).to_string(),
                    first: other.as_str(),
                    second: step.as_str(),
                });
            }
        }
        Ok(())
    }
}
