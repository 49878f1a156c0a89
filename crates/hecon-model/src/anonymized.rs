//! De-identified output rows.

use std::collections::BTreeMap;

use serde::Serialize;

/// How an anonymized cell was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    /// One-way salted digest of an identifier.
    Hashed,
    /// Random token standing in for a missing identifier.
    Placeholder,
    /// Coarse bucket replacing a precise value.
    Generalized,
    /// Analytic field passed through unchanged.
    Retained,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnonymizedField {
    pub technique: Technique,
    pub value: String,
}

/// One de-identified row keyed by output column name.
///
/// Built once from a source record and never mutated afterwards. Columns that
/// were deleted have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnonymizedRecord {
    fields: BTreeMap<String, AnonymizedField>,
}

impl AnonymizedRecord {
    pub fn new(fields: BTreeMap<String, AnonymizedField>) -> Self {
        Self { fields }
    }

    pub fn get(&self, column: &str) -> Option<&AnonymizedField> {
        self.fields.get(column)
    }

    pub fn value(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(|field| field.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnonymizedField)> {
        self.fields.iter().map(|(column, field)| (column.as_str(), field))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
