//! Explicit mapping from canonical record fields to source columns.
//!
//! The mapping is supplied by the caller (usually from the `[schema]` table of
//! the configuration file) and validated once against the input headers. No
//! component searches for alternative column names on its own.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{IngestError, Result};

/// Canonical field of a [`hecon_model::Record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    PatientId,
    AdmissionId,
    Age,
    Sex,
    AdmittedAt,
    DischargedAt,
    ClosedAt,
    BilledCost,
    DirectCost,
    StayDays,
    DischargeReason,
    Service,
    Region,
    State,
}

impl FieldRole {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldRole::PatientId => "patient_id",
            FieldRole::AdmissionId => "admission_id",
            FieldRole::Age => "age",
            FieldRole::Sex => "sex",
            FieldRole::AdmittedAt => "admitted_at",
            FieldRole::DischargedAt => "discharged_at",
            FieldRole::ClosedAt => "closed_at",
            FieldRole::BilledCost => "billed_cost",
            FieldRole::DirectCost => "direct_cost",
            FieldRole::StayDays => "stay_days",
            FieldRole::DischargeReason => "discharge_reason",
            FieldRole::Service => "service",
            FieldRole::Region => "region",
            FieldRole::State => "state",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source column bound to a role.
///
/// Deserializes from either a bare column name (`age = "edad"`, optional) or a
/// table (`billed_cost = { column = "gasto_nivel_6", required = true }`). An
/// empty column name disables the role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ColumnSpecRepr")]
pub struct ColumnSpec {
    pub column: String,
    pub required: bool,
}

impl ColumnSpec {
    pub fn optional(column: &str) -> Self {
        Self {
            column: column.to_string(),
            required: false,
        }
    }

    pub fn required(column: &str) -> Self {
        Self {
            column: column.to_string(),
            required: true,
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.column.trim().is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColumnSpecRepr {
    Name(String),
    Full {
        column: String,
        #[serde(default)]
        required: bool,
    },
}

impl From<ColumnSpecRepr> for ColumnSpec {
    fn from(repr: ColumnSpecRepr) -> Self {
        match repr {
            ColumnSpecRepr::Name(column) => ColumnSpec {
                column,
                required: false,
            },
            ColumnSpecRepr::Full { column, required } => ColumnSpec { column, required },
        }
    }
}

/// Role-to-column mapping for the discharge extract.
///
/// Defaults match the hospital discharge summary export; only the billed cost
/// column is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaMapping {
    pub patient_id: ColumnSpec,
    pub admission_id: ColumnSpec,
    pub age: ColumnSpec,
    pub sex: ColumnSpec,
    pub admitted_at: ColumnSpec,
    pub discharged_at: ColumnSpec,
    pub closed_at: ColumnSpec,
    pub billed_cost: ColumnSpec,
    pub direct_cost: ColumnSpec,
    pub stay_days: ColumnSpec,
    pub discharge_reason: ColumnSpec,
    pub service: ColumnSpec,
    pub region: ColumnSpec,
    pub state: ColumnSpec,
}

impl Default for SchemaMapping {
    fn default() -> Self {
        Self {
            patient_id: ColumnSpec::optional("n_expediente_hosp"),
            admission_id: ColumnSpec::optional("id_registro_admision"),
            age: ColumnSpec::optional("edad"),
            sex: ColumnSpec::optional("sexo"),
            admitted_at: ColumnSpec::optional("fecha_recepcion_hosp"),
            discharged_at: ColumnSpec::optional("fecha_egreso_hosp"),
            closed_at: ColumnSpec::optional("fecha_egreso_general"),
            billed_cost: ColumnSpec::required("gasto_nivel_6"),
            direct_cost: ColumnSpec::optional("gasto_nivel_1"),
            stay_days: ColumnSpec::optional("dias_hopit"),
            discharge_reason: ColumnSpec::optional("motivo_alta_hosp"),
            service: ColumnSpec::optional("servicio_origen"),
            region: ColumnSpec::optional("alcaldia_municipio"),
            state: ColumnSpec::optional("estado"),
        }
    }
}

impl SchemaMapping {
    /// Every role paired with its column spec, in declaration order.
    pub fn specs(&self) -> [(FieldRole, &ColumnSpec); 14] {
        [
            (FieldRole::PatientId, &self.patient_id),
            (FieldRole::AdmissionId, &self.admission_id),
            (FieldRole::Age, &self.age),
            (FieldRole::Sex, &self.sex),
            (FieldRole::AdmittedAt, &self.admitted_at),
            (FieldRole::DischargedAt, &self.discharged_at),
            (FieldRole::ClosedAt, &self.closed_at),
            (FieldRole::BilledCost, &self.billed_cost),
            (FieldRole::DirectCost, &self.direct_cost),
            (FieldRole::StayDays, &self.stay_days),
            (FieldRole::DischargeReason, &self.discharge_reason),
            (FieldRole::Service, &self.service),
            (FieldRole::Region, &self.region),
            (FieldRole::State, &self.state),
        ]
    }

    pub fn spec(&self, role: FieldRole) -> &ColumnSpec {
        match role {
            FieldRole::PatientId => &self.patient_id,
            FieldRole::AdmissionId => &self.admission_id,
            FieldRole::Age => &self.age,
            FieldRole::Sex => &self.sex,
            FieldRole::AdmittedAt => &self.admitted_at,
            FieldRole::DischargedAt => &self.discharged_at,
            FieldRole::ClosedAt => &self.closed_at,
            FieldRole::BilledCost => &self.billed_cost,
            FieldRole::DirectCost => &self.direct_cost,
            FieldRole::StayDays => &self.stay_days,
            FieldRole::DischargeReason => &self.discharge_reason,
            FieldRole::Service => &self.service,
            FieldRole::Region => &self.region,
            FieldRole::State => &self.state,
        }
    }

    /// Copy with every role optional, for passes such as anonymization that
    /// only use whichever roles the input carries.
    pub fn all_optional(&self) -> Self {
        let mut relaxed = self.clone();
        for spec in [
            &mut relaxed.patient_id,
            &mut relaxed.admission_id,
            &mut relaxed.age,
            &mut relaxed.sex,
            &mut relaxed.admitted_at,
            &mut relaxed.discharged_at,
            &mut relaxed.closed_at,
            &mut relaxed.billed_cost,
            &mut relaxed.direct_cost,
            &mut relaxed.stay_days,
            &mut relaxed.discharge_reason,
            &mut relaxed.service,
            &mut relaxed.region,
            &mut relaxed.state,
        ] {
            spec.required = false;
        }
        relaxed
    }

    /// Validates the mapping against input headers (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Schema`] naming the first required column that
    /// is absent.
    pub fn resolve(&self, headers: &[String]) -> Result<ResolvedSchema> {
        let mut indexes = BTreeMap::new();
        let mut missing_optional = Vec::new();
        for (role, spec) in self.specs() {
            if spec.is_disabled() {
                if spec.required {
                    return Err(IngestError::Schema {
                        column: role.as_str().to_string(),
                    });
                }
                continue;
            }
            match headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(spec.column.trim()))
            {
                Some(index) => {
                    indexes.insert(role, index);
                }
                None if spec.required => {
                    return Err(IngestError::Schema {
                        column: spec.column.clone(),
                    });
                }
                None => missing_optional.push(role),
            }
        }
        Ok(ResolvedSchema {
            indexes,
            missing_optional,
        })
    }
}

/// Column positions for the roles present in a particular input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSchema {
    indexes: BTreeMap<FieldRole, usize>,
    missing_optional: Vec<FieldRole>,
}

impl ResolvedSchema {
    pub fn index(&self, role: FieldRole) -> Option<usize> {
        self.indexes.get(&role).copied()
    }

    pub fn has(&self, role: FieldRole) -> bool {
        self.indexes.contains_key(&role)
    }

    /// Optional roles whose column was not found; the features that depend on
    /// them are skipped.
    pub fn missing_optional(&self) -> &[FieldRole] {
        &self.missing_optional
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn resolves_present_columns_case_insensitively() {
        let mapping = SchemaMapping::default();
        let resolved = mapping
            .resolve(&headers(&["EDAD", "gasto_nivel_6", "sexo"]))
            .unwrap();
        assert_eq!(resolved.index(FieldRole::Age), Some(0));
        assert_eq!(resolved.index(FieldRole::BilledCost), Some(1));
        assert!(resolved.missing_optional().contains(&FieldRole::Service));
    }

    #[test]
    fn missing_required_column_is_schema_error() {
        let mapping = SchemaMapping::default();
        let err = mapping.resolve(&headers(&["edad"])).unwrap_err();
        match err {
            IngestError::Schema { column } => assert_eq!(column, "gasto_nivel_6"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn disabled_optional_role_is_ignored() {
        let mapping = SchemaMapping {
            service: ColumnSpec::optional(""),
            ..SchemaMapping::default()
        };
        let resolved = mapping.resolve(&headers(&["gasto_nivel_6"])).unwrap();
        assert!(!resolved.has(FieldRole::Service));
        assert!(!resolved.missing_optional().contains(&FieldRole::Service));
    }

    #[test]
    fn all_optional_accepts_input_without_required_columns() {
        let mapping = SchemaMapping {
            service: ColumnSpec::required("servicio_origen"),
            ..SchemaMapping::default()
        };
        let relaxed = mapping.all_optional();
        assert!(relaxed.specs().iter().all(|(_, spec)| !spec.required));
        assert_eq!(relaxed.billed_cost.column, "gasto_nivel_6");

        let resolved = relaxed.resolve(&headers(&["edad"])).unwrap();
        assert!(resolved.has(FieldRole::Age));
        assert!(resolved.missing_optional().contains(&FieldRole::BilledCost));
    }

    #[test]
    fn spec_lookup_by_role() {
        let mapping = SchemaMapping::default();
        assert_eq!(mapping.spec(FieldRole::Age).column, "edad");
        assert!(mapping.spec(FieldRole::BilledCost).required);
    }
}
