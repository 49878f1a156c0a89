//! Aggregation, segmentation, forecasting and alerting over synthetic records.

use chrono::NaiveDate;
use hecon_analytics::alerts::{Flat, NormalNoise};
use hecon_analytics::{
    AggregateRequest, AlertInput, AlertThresholds, Dimension, ForecastStrategy, Metric,
    aggregate, cost_forecast, demand_forecast, generate_alerts, profile_units, segment, summarize,
};
use hecon_model::{AggregateBucket, AlertCategory, BucketMetric, ClusterLabel, Record, Severity};
use proptest::prelude::*;

fn encounter(service: &str, cost: f64, day: (i32, u32, u32)) -> Record {
    Record {
        service: Some(service.to_string()),
        billed_cost: Some(cost),
        closed_at: NaiveDate::from_ymd_opt(day.0, day.1, day.2)
            .and_then(|d| d.and_hms_opt(10, 30, 0)),
        ..Record::default()
    }
}

fn bucket(key: String, sum: f64) -> AggregateBucket {
    AggregateBucket {
        key,
        sum: Some(sum),
        mean: Some(sum),
        count: 1,
        contributing: 1,
        percentage_of_total: None,
    }
}

#[test]
fn shares_add_up_to_one_hundred() {
    let records: Vec<Record> = ["URGENCIAS", "CIRUGIA", "PEDIATRIA", "URGENCIAS", "GINECOLOGIA"]
        .iter()
        .zip([120.0, 75.5, 310.0, 44.5, 1000.0])
        .map(|(service, cost)| encounter(service, cost, (2025, 1, 1)))
        .collect();
    let buckets = aggregate(
        &records,
        &AggregateRequest::new(Dimension::Service, Metric::BilledCost),
    );
    let total: f64 = buckets.iter().filter_map(|b| b.percentage_of_total).sum();
    assert!((total - 100.0).abs() < 1e-9);
    assert_eq!(buckets[0].key, "GINECOLOGIA");
}

#[test]
fn twenty_five_units_split_evenly_into_five_clusters() {
    let buckets: Vec<_> = (1..=25)
        .map(|i| bucket(format!("SERVICE_{i:02}"), f64::from(i) * 1000.0))
        .collect();
    let segments = segment(&buckets, BucketMetric::Sum, 5);
    let summary = summarize(&segments, 5);
    assert_eq!(summary.members_per_cluster, vec![5; 5]);
    assert!(!summary.degenerate);

    let top = segments.iter().find(|s| s.bucket.key == "SERVICE_25").unwrap();
    assert_eq!(top.cluster_id, 0);
    assert_eq!(top.label, ClusterLabel::HighVolume);
}

#[test]
fn cost_outlier_alert_counts_planted_outliers() {
    let mut records: Vec<Record> = (0..95)
        .map(|i| encounter("URGENCIAS", 100.0, (2025, 1, 1 + i % 28)))
        .collect();
    records.extend((0..5).map(|_| encounter("CIRUGIA", 1000.0, (2025, 1, 15))));

    let input = AlertInput {
        records: &records,
        units: &[],
    };
    let alerts = generate_alerts(&input, &AlertThresholds::default(), &Flat);
    let outliers = alerts
        .iter()
        .find(|a| a.category == AlertCategory::Financial)
        .unwrap();
    assert_eq!(outliers.evidence, 5.0);
    assert_eq!(outliers.severity, Severity::High);
}

#[test]
fn alert_list_is_capped() {
    let records: Vec<Record> = (0..40u32)
        .map(|i| {
            encounter(
                &format!("S{i:02}"),
                f64::from(i % 7) * 100.0,
                (2025, 1 + i % 12, 5),
            )
        })
        .collect();
    let units = profile_units(&records, Dimension::Service);
    let thresholds = AlertThresholds {
        growth_threshold: 0.0,
        max_alerts: 3,
        ..AlertThresholds::default()
    };
    let input = AlertInput {
        records: &records,
        units: &units,
    };
    let alerts = generate_alerts(&input, &thresholds, &NormalNoise::new(42));
    assert_eq!(alerts.len(), 3);
    let again = generate_alerts(&input, &thresholds, &NormalNoise::new(42));
    assert_eq!(alerts, again);
}

#[test]
fn monthly_cost_forecast_extends_history() {
    let records = vec![
        encounter("A", 100.0, (2025, 1, 3)),
        encounter("A", 200.0, (2025, 2, 3)),
        encounter("A", 300.0, (2025, 3, 3)),
        encounter("A", 400.0, (2025, 4, 3)),
    ];
    let forecast = cost_forecast(&records, 2, ForecastStrategy::Simple).unwrap();
    assert_eq!(forecast.table.len(), 6);
    assert!((forecast.forecast.model.slope() - 100.0).abs() < 1e-9);
    assert_eq!(forecast.monthly_mean, Some(250.0));
    assert!(!forecast.forecast.degenerate);

    assert!(cost_forecast(&records, 2, ForecastStrategy::Disabled).is_none());
}

#[test]
fn demand_forecast_never_drops_below_one_patient() {
    let records: Vec<Record> = (1..=10)
        .flat_map(|day| {
            let n = 11 - day;
            (0..n).map(move |_| encounter("URGENCIAS", 10.0, (2025, 3, day)))
        })
        .collect();
    let demand = demand_forecast(&records, 30, ForecastStrategy::Simple).unwrap();
    assert_eq!(demand.points.len(), 30);
    assert!(demand.points.iter().all(|p| p.patients.unwrap_or(0) >= 1));
}

proptest! {
    #[test]
    fn higher_ranked_buckets_never_get_a_later_band(
        sums in prop::collection::vec(0.0f64..1_000_000.0, 1..60),
        n_clusters in 1usize..8,
    ) {
        let buckets: Vec<_> = sums
            .iter()
            .enumerate()
            .map(|(i, sum)| bucket(format!("U{i:03}"), *sum))
            .collect();
        let segments = segment(&buckets, BucketMetric::Sum, n_clusters);
        prop_assert_eq!(segments.len(), buckets.len());
        for pair in segments.windows(2) {
            prop_assert!(pair[0].bucket.sum >= pair[1].bucket.sum);
            prop_assert!(pair[0].cluster_id <= pair[1].cluster_id);
        }
        prop_assert!(segments.iter().all(|s| s.cluster_id < n_clusters));
    }
}
