//! Headline financial, operational and demographic figures.

use std::collections::BTreeMap;

use chrono::Duration;
use hecon_analytics::stats::mean;
use hecon_model::{Record, fold_upper};
use serde::Serialize;

use crate::finite;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialMetrics {
    pub total_billed: f64,
    pub total_direct_cost: f64,
    pub mean_billed: Option<f64>,
    /// `(billed - direct) / billed`, in percent.
    pub gross_margin_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationalMetrics {
    pub total_encounters: usize,
    /// Encounters ending in the 30 days up to the latest episode end.
    pub encounters_last_30_days: usize,
    pub mean_stay_days: Option<f64>,
    pub mortality_rate_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicMetrics {
    pub mean_age: Option<f64>,
    /// Percent of encounters per sex.
    pub sex_distribution: BTreeMap<String, f64>,
    /// Percent of encounters with a discharge reason, per reason.
    pub discharge_reason_distribution: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrincipalMetrics {
    pub financial: FinancialMetrics,
    pub operational: OperationalMetrics,
    pub demographic: DemographicMetrics,
}

pub fn principal_metrics(records: &[Record], death_label: &str) -> PrincipalMetrics {
    PrincipalMetrics {
        financial: financial(records),
        operational: operational(records, death_label),
        demographic: demographic(records),
    }
}

fn financial(records: &[Record]) -> FinancialMetrics {
    let billed: Vec<f64> = records.iter().filter_map(|r| r.billed_cost).collect();
    let total_billed: f64 = billed.iter().sum();
    let total_direct_cost: f64 = records.iter().filter_map(|r| r.direct_cost).sum();
    let gross_margin_pct = (total_billed > 0.0)
        .then(|| (total_billed - total_direct_cost) / total_billed * 100.0);
    FinancialMetrics {
        total_billed,
        total_direct_cost,
        mean_billed: finite(mean(&billed)),
        gross_margin_pct: finite(gross_margin_pct),
    }
}

fn operational(records: &[Record], death_label: &str) -> OperationalMetrics {
    let ends: Vec<_> = records.iter().filter_map(Record::episode_end).collect();
    let encounters_last_30_days = ends.iter().max().map_or(0, |latest| {
        let cutoff = *latest - Duration::days(30);
        ends.iter().filter(|end| **end >= cutoff).count()
    });
    let stays: Vec<f64> = records
        .iter()
        .filter_map(|r| r.length_of_stay)
        .map(|days| days as f64)
        .collect();
    let label = fold_upper(death_label);
    let deaths = records
        .iter()
        .filter_map(|r| r.discharge_reason.as_deref())
        .filter(|reason| fold_upper(reason) == label)
        .count();
    let mortality_rate_pct =
        (!records.is_empty()).then(|| deaths as f64 / records.len() as f64 * 100.0);

    OperationalMetrics {
        total_encounters: records.len(),
        encounters_last_30_days,
        mean_stay_days: finite(mean(&stays)),
        mortality_rate_pct,
    }
}

fn demographic(records: &[Record]) -> DemographicMetrics {
    let ages: Vec<f64> = records.iter().filter_map(|r| r.age).map(f64::from).collect();
    let sex_distribution = shares(records.iter().map(|r| r.sex.as_str().to_string()));
    let discharge_reason_distribution = shares(
        records
            .iter()
            .filter_map(|r| r.discharge_reason.as_deref())
            .map(|reason| reason.trim().to_string())
            .filter(|reason| !reason.is_empty()),
    );
    DemographicMetrics {
        mean_age: finite(mean(&ages)),
        sex_distribution,
        discharge_reason_distribution,
    }
}

/// Percent share of each distinct value.
fn shares(values: impl Iterator<Item = String>) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for value in values {
        *counts.entry(value).or_default() += 1;
    }
    let total: usize = counts.values().sum();
    counts
        .into_iter()
        .map(|(value, count)| (value, count as f64 / total as f64 * 100.0))
        .collect()
}
