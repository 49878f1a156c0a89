//! Seasonal adjustment factors applied to trend projections.

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};
use hecon_model::{Period, TrendModel};
use serde::Serialize;

/// Multiplicative adjustment for a target period.
pub trait SeasonalFactor {
    fn factor(&self, period: &Period) -> f64;

    /// Short name reported in the model summary.
    fn name(&self) -> &'static str;
}

/// Factor 1.0 everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSeasonality;

impl SeasonalFactor for NoSeasonality {
    fn factor(&self, _period: &Period) -> f64 {
        1.0
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Fixed calendar-month factors: December and January up 10%, July and
/// August down 5%.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthOfYear;

impl SeasonalFactor for MonthOfYear {
    fn factor(&self, period: &Period) -> f64 {
        match period.month() {
            Some(12 | 1) => 1.10,
            Some(7 | 8) => 0.95,
            _ => 1.0,
        }
    }

    fn name(&self) -> &'static str {
        "month_of_year"
    }
}

/// Fixed weekday factors for daily demand.
#[derive(Debug, Clone, Copy, Default)]
pub struct DayOfWeek;

impl SeasonalFactor for DayOfWeek {
    fn factor(&self, period: &Period) -> f64 {
        match period.weekday() {
            Some(Weekday::Sat) => 1.2,
            Some(Weekday::Sun) => 0.8,
            Some(Weekday::Mon | Weekday::Tue) => 1.1,
            _ => 1.0,
        }
    }

    fn name(&self) -> &'static str {
        "day_of_week"
    }
}

/// Calendar slot a period falls in: weekday for days, month for months,
/// quarter for quarters. Years share one slot.
fn slot(period: &Period) -> u32 {
    match period {
        Period::Day(date) => date.weekday().num_days_from_monday(),
        Period::Month { month, .. } => *month,
        Period::Quarter { quarter, .. } => *quarter,
        Period::Year(_) => 0,
    }
}

/// Factors estimated from the data: per calendar slot, the mean ratio of
/// observed to fitted values, rescaled so the slots average 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeasonalIndex {
    factors: BTreeMap<u32, f64>,
}

impl SeasonalIndex {
    /// Estimates slot factors from a fitted series. Points with no value or
    /// a non-positive fitted value are ignored; slots never observed get 1.0.
    pub fn estimate(periods: &[Period], values: &[Option<f64>], model: &TrendModel) -> Self {
        let mut ratios: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for (idx, (period, value)) in periods.iter().zip(values).enumerate() {
            let Some(observed) = value else {
                continue;
            };
            let fitted = model.value_at(idx);
            if fitted <= 0.0 {
                continue;
            }
            ratios.entry(slot(period)).or_default().push(observed / fitted);
        }

        let mut factors: BTreeMap<u32, f64> = ratios
            .into_iter()
            .map(|(slot, values)| (slot, values.iter().sum::<f64>() / values.len() as f64))
            .collect();
        let average = factors.values().sum::<f64>() / factors.len().max(1) as f64;
        if average > 0.0 {
            for factor in factors.values_mut() {
                *factor /= average;
            }
        }
        Self { factors }
    }

    pub fn slots(&self) -> usize {
        self.factors.len()
    }
}

impl SeasonalFactor for SeasonalIndex {
    fn factor(&self, period: &Period) -> f64 {
        self.factors.get(&slot(period)).copied().unwrap_or(1.0)
    }

    fn name(&self) -> &'static str {
        "seasonal_index"
    }
}
