//! Canonical patient-encounter record.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Upper bound (inclusive) for a plausible age in years.
pub const MAX_PLAUSIBLE_AGE: u8 = 120;

/// Administrative sex as recorded on the discharge extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unspecified,
}

impl Sex {
    pub fn as_str(self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unspecified => "unspecified",
        }
    }
}

/// One normalized patient encounter.
///
/// Typed fields are populated through the schema mapping; `attributes` keeps
/// every trimmed, non-empty source cell keyed by its source column name so that
/// column-level transforms can see the whole row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub patient_id: Option<String>,
    pub admission_id: Option<String>,
    /// Age in years, `None` when missing or outside `0..=120`.
    pub age: Option<u8>,
    pub sex: Sex,
    pub admitted_at: Option<NaiveDateTime>,
    pub discharged_at: Option<NaiveDateTime>,
    /// General (episode) discharge timestamp.
    pub closed_at: Option<NaiveDateTime>,
    /// Billed cost (level 6), never negative.
    pub billed_cost: Option<f64>,
    /// Direct cost (level 1), never negative.
    pub direct_cost: Option<f64>,
    /// Length of stay in whole days.
    pub length_of_stay: Option<i64>,
    pub discharge_reason: Option<String>,
    pub service: Option<String>,
    pub region: Option<String>,
    pub state: Option<String>,
    pub attributes: BTreeMap<String, String>,
}

impl Record {
    /// Timestamp that places the encounter in time: the general discharge,
    /// falling back to the hospital discharge.
    pub fn episode_end(&self) -> Option<NaiveDateTime> {
        self.closed_at.or(self.discharged_at)
    }

    /// Raw source cell for a column, if present and non-empty.
    pub fn attribute(&self, column: &str) -> Option<&str> {
        self.attributes.get(column).map(String::as_str)
    }
}
