//! Predictive-change alerts per aggregate unit.

use hecon_model::{Alert, AlertCategory, Severity, Tier};

use super::AlertThresholds;
use super::growth::{GrowthEstimator, PeerStats};
use crate::aggregate::UnitProfile;

/// Confidence grows with the unit's encounter count among its peers.
pub fn confidence_tier(unit: &UnitProfile, peers: &PeerStats) -> Tier {
    let encounters = unit.encounters as f64;
    if encounters > peers.encounters_p75 {
        Tier::High
    } else if encounters > peers.encounters_p50 {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// Impact from the unit's share of billed revenue.
pub fn impact_tier(unit: &UnitProfile) -> Tier {
    match unit.revenue_share {
        Some(share) if share > 10.0 => Tier::High,
        Some(share) if share > 3.0 => Tier::Medium,
        _ => Tier::Low,
    }
}

pub(crate) fn predictive_alerts(
    units: &[UnitProfile],
    thresholds: &AlertThresholds,
    estimator: &dyn GrowthEstimator,
) -> Vec<Alert> {
    let Some(peers) = PeerStats::from_units(units) else {
        return Vec::new();
    };
    units
        .iter()
        .filter_map(|unit| {
            let delta = estimator.estimate_growth(unit, &peers);
            if !delta.is_finite() || delta.abs() <= thresholds.growth_threshold {
                return None;
            }
            let direction = if delta > 0.0 { "increase" } else { "decrease" };
            let severity = if delta.abs() > 2.0 * thresholds.growth_threshold {
                Severity::High
            } else {
                Severity::Medium
            };
            Some(Alert {
                title: format!("Projected {direction} in {}", unit.unit),
                description: format!(
                    "{} estimates a {:.1}% {direction} in billed revenue",
                    estimator.name(),
                    delta.abs() * 100.0
                ),
                severity,
                category: AlertCategory::Predictive,
                evidence: delta * 100.0,
                impact: impact_tier(unit),
                confidence: Some(confidence_tier(unit, &peers)),
                unit: Some(unit.unit.clone()),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(f64);

    impl GrowthEstimator for Fixed {
        fn estimate_growth(&self, _unit: &UnitProfile, _peers: &PeerStats) -> f64 {
            self.0
        }

        fn name(&self) -> &'static str {
            "fixed"
        }
    }

    fn unit(name: &str, encounters: usize, share: f64) -> UnitProfile {
        UnitProfile {
            unit: name.to_string(),
            billed_total: share * 10.0,
            billed_mean: None,
            encounters,
            mean_stay: None,
            revenue_share: Some(share),
            monthly_billed: Vec::new(),
        }
    }

    #[test]
    fn tiers_follow_share_and_volume() {
        let units = vec![
            unit("A", 100, 50.0),
            unit("B", 50, 30.0),
            unit("C", 10, 15.0),
            unit("D", 5, 5.0),
            unit("E", 1, 0.0),
        ];
        let peers = PeerStats::from_units(&units).unwrap();
        assert_eq!(confidence_tier(&units[0], &peers), Tier::High);
        assert_eq!(confidence_tier(&units[1], &peers), Tier::Medium);
        assert_eq!(confidence_tier(&units[4], &peers), Tier::Low);
        assert_eq!(impact_tier(&units[2]), Tier::High);
        assert_eq!(impact_tier(&units[3]), Tier::Medium);
        assert_eq!(impact_tier(&units[4]), Tier::Low);
    }

    #[test]
    fn small_changes_stay_quiet() {
        let units = vec![unit("A", 10, 50.0), unit("B", 5, 50.0)];
        let thresholds = AlertThresholds::default();
        assert!(predictive_alerts(&units, &thresholds, &Fixed(0.10)).is_empty());

        let alerts = predictive_alerts(&units, &thresholds, &Fixed(-0.15));
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].title, "Projected decrease in A");
        assert!((alerts[0].evidence + 15.0).abs() < 1e-9);
        assert_eq!(alerts[0].severity, Severity::Medium);
    }
}
