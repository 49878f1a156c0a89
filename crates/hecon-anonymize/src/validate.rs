//! Heuristic re-identification checks over an anonymized dataset.
//!
//! A clean outcome means none of the known patterns were found. It does not
//! prove the dataset cannot be re-identified.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use hecon_model::Technique;

use crate::anonymizer::AnonymizedDataset;
use crate::policy::MASKED_SUFFIXES;

/// Column-name fragments that indicate a direct identifier.
const IDENTIFIER_FRAGMENTS: &[&str] = &[
    "nombre", "apellido", "telefono", "direccion", "email", "curp", "rfc", "nss",
];

/// Column-name fragments that indicate preserved analytic value.
const ANALYTIC_FRAGMENTS: &[&str] = &[
    "motivo",
    "diagnostico",
    "gasto",
    "costo",
    "importe",
    "servicio",
    "sexo",
];

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$").expect("Invalid e-mail regex")
});

/// Phone numbers of nine or more digits, optionally with separators or a +52 prefix.
static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+?52[\s-]?)?\d{2,4}[\s-]?\d{3,4}[\s-]?\d{4}$").expect("Invalid phone regex")
});

static CURP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z]{4}\d{6}[HM][A-Z]{5}[A-Z0-9]\d$").expect("Invalid CURP regex")
});

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationOutcome {
    pub clean: bool,
    /// Columns whose name or retained values look like direct identifiers.
    pub suspicious_fields: Vec<String>,
    /// Output columns that still carry analytic information.
    pub analytic_fields: usize,
}

/// Scans column names and retained cells for direct-identifier patterns.
pub fn validate_dataset(dataset: &AnonymizedDataset) -> ValidationOutcome {
    let mut suspicious_fields = Vec::new();
    let mut analytic_fields = 0;

    for column in &dataset.columns {
        let lower = column.to_lowercase();
        if ANALYTIC_FRAGMENTS.iter().any(|f| lower.contains(*f)) {
            analytic_fields += 1;
        }
        let masked = MASKED_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix));
        if !masked && IDENTIFIER_FRAGMENTS.iter().any(|f| lower.contains(*f)) {
            suspicious_fields.push(column.clone());
            continue;
        }
        let leaks = dataset.records.iter().any(|record| {
            record.get(column).is_some_and(|field| {
                field.technique == Technique::Retained && looks_like_identifier(&field.value)
            })
        });
        if leaks {
            suspicious_fields.push(column.clone());
        }
    }

    for column in &suspicious_fields {
        tracing::warn!(column = %column, "possible direct identifier in anonymized output");
    }

    ValidationOutcome {
        clean: suspicious_fields.is_empty(),
        suspicious_fields,
        analytic_fields,
    }
}

/// True when a value matches an e-mail, phone or CURP pattern.
pub fn looks_like_identifier(value: &str) -> bool {
    let trimmed = value.trim();
    EMAIL_REGEX.is_match(trimmed) || PHONE_REGEX.is_match(trimmed) || CURP_REGEX.is_match(trimmed)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use hecon_model::{AnonymizedField, AnonymizedRecord};

    use super::*;

    fn dataset(cells: &[(&str, Technique, &str)]) -> AnonymizedDataset {
        let fields: BTreeMap<String, AnonymizedField> = cells
            .iter()
            .map(|(column, technique, value)| {
                (
                    (*column).to_string(),
                    AnonymizedField {
                        technique: *technique,
                        value: (*value).to_string(),
                    },
                )
            })
            .collect();
        AnonymizedDataset {
            columns: cells.iter().map(|(column, _, _)| (*column).to_string()).collect(),
            records: vec![AnonymizedRecord::new(fields)],
        }
    }

    #[test]
    fn generalized_outputs_are_not_flagged() {
        let outcome = validate_dataset(&dataset(&[
            ("telefono_contacto_hash", Technique::Hashed, "HASH_AB"),
            ("direccion_zone", Technique::Generalized, "ZONA_SUR"),
            ("nombre_edad_grupo", Technique::Generalized, "18_29"),
            ("fecha_nombre_periodo", Technique::Generalized, "2025-03"),
            ("gasto_nivel_6", Technique::Retained, "1200"),
        ]));
        assert!(outcome.clean, "{:?}", outcome.suspicious_fields);
        assert_eq!(outcome.analytic_fields, 1);
    }

    #[test]
    fn residual_identifiers_are_flagged() {
        let outcome = validate_dataset(&dataset(&[
            ("nombre_paciente", Technique::Retained, "Ana"),
            ("contacto", Technique::Retained, "ana.perez@example.com"),
            ("nombre_periodo_extra", Technique::Retained, "x"),
        ]));
        assert!(!outcome.clean);
        assert_eq!(
            outcome.suspicious_fields,
            vec!["nombre_paciente", "contacto", "nombre_periodo_extra"]
        );
    }

    #[test]
    fn identifier_patterns() {
        assert!(looks_like_identifier("ana.perez@example.com"));
        assert!(looks_like_identifier("55 1234 5678"));
        assert!(looks_like_identifier("+52 55-1234-5678"));
        assert!(looks_like_identifier("PEGA800101HDFRRN09"));
        assert!(!looks_like_identifier("1500.50"));
        assert!(!looks_like_identifier("DEFUNCION"));
        assert!(!looks_like_identifier("2025-03"));
    }
}
