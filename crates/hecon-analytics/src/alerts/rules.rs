//! Fixed-threshold alert rules over the record set.

use hecon_model::{Alert, AlertCategory, Record, Severity, fold_upper};

use super::AlertThresholds;
use crate::stats::{mean, percentile};

fn rule_alert(
    title: &str,
    description: String,
    severity: Severity,
    category: AlertCategory,
    evidence: f64,
) -> Alert {
    Alert {
        title: title.to_string(),
        description,
        severity,
        category,
        evidence,
        impact: severity.into(),
        confidence: None,
        unit: None,
    }
}

/// Encounters billed strictly above the configured percentile.
pub(crate) fn cost_outliers(records: &[Record], thresholds: &AlertThresholds) -> Option<Alert> {
    let costs: Vec<f64> = records
        .iter()
        .filter_map(|r| r.billed_cost)
        .filter(|c| c.is_finite())
        .collect();
    let cutoff = percentile(&costs, thresholds.outlier_percentile)?;
    let count = costs.iter().filter(|c| **c > cutoff).count();
    (count > 0).then(|| {
        rule_alert(
            "Cost outliers",
            format!(
                "{count} encounters billed above the p{} cutoff of {cutoff:.2}",
                thresholds.outlier_percentile
            ),
            Severity::High,
            AlertCategory::Financial,
            count as f64,
        )
    })
}

/// Stays longer than `prolonged_stay_factor` times the mean stay.
pub(crate) fn prolonged_stays(records: &[Record], thresholds: &AlertThresholds) -> Option<Alert> {
    let stays: Vec<f64> = records
        .iter()
        .filter_map(|r| r.length_of_stay)
        .map(|days| days as f64)
        .collect();
    let limit = mean(&stays)? * thresholds.prolonged_stay_factor;
    let count = stays.iter().filter(|s| **s > limit).count();
    (count > 0).then(|| {
        rule_alert(
            "Prolonged stays",
            format!("{count} stays exceed {limit:.1} days"),
            Severity::Medium,
            AlertCategory::Operational,
            count as f64,
        )
    })
}

/// Share of encounters whose discharge reason is the death label.
pub(crate) fn mortality_rate(records: &[Record], thresholds: &AlertThresholds) -> Option<Alert> {
    if records.is_empty() {
        return None;
    }
    let label = fold_upper(&thresholds.death_label);
    let deaths = records
        .iter()
        .filter_map(|r| r.discharge_reason.as_deref())
        .filter(|reason| fold_upper(reason) == label)
        .count();
    let rate = deaths as f64 / records.len() as f64 * 100.0;
    (rate > thresholds.mortality_rate_pct).then(|| {
        rule_alert(
            "Mortality rate",
            format!(
                "{rate:.2}% of encounters ended in death, above the {}% threshold",
                thresholds.mortality_rate_pct
            ),
            Severity::High,
            AlertCategory::Clinical,
            rate,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn billed(cost: f64) -> Record {
        Record {
            billed_cost: Some(cost),
            ..Record::default()
        }
    }

    fn discharged(reason: &str) -> Record {
        Record {
            discharge_reason: Some(reason.to_string()),
            ..Record::default()
        }
    }

    #[test]
    fn uniform_costs_have_no_outliers() {
        let records: Vec<_> = (0..20).map(|_| billed(50.0)).collect();
        assert!(cost_outliers(&records, &AlertThresholds::default()).is_none());
    }

    #[test]
    fn prolonged_stay_counts_above_twice_mean() {
        let mut records: Vec<Record> = (0..9)
            .map(|_| Record {
                length_of_stay: Some(2),
                ..Record::default()
            })
            .collect();
        records.push(Record {
            length_of_stay: Some(20),
            ..Record::default()
        });
        let alert = prolonged_stays(&records, &AlertThresholds::default()).unwrap();
        assert_eq!(alert.evidence, 1.0);
        assert_eq!(alert.severity, Severity::Medium);
    }

    #[test]
    fn mortality_matches_without_accents() {
        let mut records: Vec<_> = (0..18).map(|_| discharged("MEJORIA")).collect();
        records.push(discharged("defuncion"));
        records.push(discharged("Defunción "));
        let alert = mortality_rate(&records, &AlertThresholds::default()).unwrap();
        assert!((alert.evidence - 10.0).abs() < 1e-9);
        assert_eq!(alert.category, AlertCategory::Clinical);
    }

    #[test]
    fn mortality_at_threshold_does_not_fire() {
        let mut records: Vec<_> = (0..19).map(|_| discharged("MEJORIA")).collect();
        records.push(discharged("DEFUNCIÓN"));
        assert!(mortality_rate(&records, &AlertThresholds::default()).is_none());
    }
}
