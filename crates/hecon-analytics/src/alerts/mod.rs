//! Ranked operational alerts.
//!
//! Three fixed rules run over the record set (cost outliers, prolonged stays
//! and mortality rate); predictive-change alerts run per unit profile
//! through a [`GrowthEstimator`]. The merged list is ranked by impact tier
//! then evidence magnitude and truncated to `max_alerts`.

mod growth;
mod predictive;
mod rules;

pub use growth::{EstimatorKind, Flat, GrowthEstimator, NormalNoise, PeerStats, TrendSlope};
pub use predictive::{confidence_tier, impact_tier};

use std::time::Instant;

use hecon_model::{Alert, Record};
use serde::{Deserialize, Serialize};

use crate::aggregate::UnitProfile;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertThresholds {
    /// Billed costs strictly above this percentile (0-100) are outliers.
    pub outlier_percentile: f64,
    /// Stays longer than this multiple of the mean stay are prolonged.
    pub prolonged_stay_factor: f64,
    /// Mortality alert fires above this percentage of encounters.
    pub mortality_rate_pct: f64,
    /// Discharge reason counted as a death, compared without case or accents.
    pub death_label: String,
    /// Minimum absolute fractional change for a predictive alert.
    pub growth_threshold: f64,
    pub max_alerts: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            outlier_percentile: 95.0,
            prolonged_stay_factor: 2.0,
            mortality_rate_pct: 5.0,
            death_label: "DEFUNCIÓN".to_string(),
            growth_threshold: 0.10,
            max_alerts: 5,
        }
    }
}

/// Inputs the alert rules read.
#[derive(Debug, Clone, Copy)]
pub struct AlertInput<'a> {
    pub records: &'a [Record],
    pub units: &'a [UnitProfile],
}

/// Evaluates every rule and returns at most `thresholds.max_alerts` alerts.
pub fn generate_alerts(
    input: &AlertInput<'_>,
    thresholds: &AlertThresholds,
    estimator: &dyn GrowthEstimator,
) -> Vec<Alert> {
    let start = Instant::now();
    let mut alerts: Vec<Alert> = [
        rules::cost_outliers(input.records, thresholds),
        rules::prolonged_stays(input.records, thresholds),
        rules::mortality_rate(input.records, thresholds),
    ]
    .into_iter()
    .flatten()
    .collect();
    alerts.extend(predictive::predictive_alerts(
        input.units,
        thresholds,
        estimator,
    ));

    let candidates = alerts.len();
    rank_alerts(&mut alerts);
    alerts.truncate(thresholds.max_alerts);
    tracing::info!(
        candidates,
        emitted = alerts.len(),
        estimator = estimator.name(),
        duration_ms = start.elapsed().as_millis(),
        "alerts generated"
    );
    alerts
}

/// Impact tier descending, then |evidence| descending, then title.
pub fn rank_alerts(alerts: &mut [Alert]) {
    alerts.sort_by(|a, b| {
        b.impact
            .cmp(&a.impact)
            .then_with(|| b.evidence.abs().total_cmp(&a.evidence.abs()))
            .then_with(|| a.title.cmp(&b.title))
    });
}

#[cfg(test)]
mod tests {
    use hecon_model::{AlertCategory, Severity, Tier};

    use super::*;

    fn alert(title: &str, impact: Tier, evidence: f64) -> Alert {
        Alert {
            title: title.to_string(),
            description: String::new(),
            severity: Severity::Low,
            category: AlertCategory::Predictive,
            evidence,
            impact,
            confidence: None,
            unit: None,
        }
    }

    #[test]
    fn ranking_orders_by_impact_then_magnitude() {
        let mut alerts = vec![
            alert("b", Tier::Medium, 50.0),
            alert("a", Tier::High, 1.0),
            alert("c", Tier::Medium, -80.0),
            alert("d", Tier::Medium, 50.0),
        ];
        rank_alerts(&mut alerts);
        let titles: Vec<_> = alerts.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn thresholds_deserialize_with_defaults() {
        let thresholds: AlertThresholds =
            serde_json::from_str(r#"{"max_alerts": 3}"#).unwrap();
        assert_eq!(thresholds.max_alerts, 3);
        assert_eq!(thresholds.outlier_percentile, 95.0);
        assert_eq!(thresholds.death_label, "DEFUNCIÓN");
    }

    #[test]
    fn empty_input_yields_no_alerts() {
        let input = AlertInput {
            records: &[],
            units: &[],
        };
        assert!(generate_alerts(&input, &AlertThresholds::default(), &Flat).is_empty());
    }
}
