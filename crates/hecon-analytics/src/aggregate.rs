//! Grouping of records by a dimension with sum, mean and count metrics.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use hecon_model::{AggregateBucket, BucketMetric, Granularity, Period, Record};
use serde::{Deserialize, Serialize};

use crate::stats::mean;

/// Grouping key of an aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Service,
    DischargeReason,
    Region,
    State,
    /// Calendar period of the general discharge, falling back to the hospital
    /// discharge.
    Period(Granularity),
}

impl Dimension {
    pub fn as_str(&self) -> &'static str {
        match self {
            Dimension::Service => "service",
            Dimension::DischargeReason => "discharge_reason",
            Dimension::Region => "region",
            Dimension::State => "state",
            Dimension::Period(_) => "period",
        }
    }

    fn key(&self, record: &Record) -> Option<GroupKey> {
        let text = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| GroupKey::Text(v.to_string()))
        };
        match self {
            Dimension::Service => text(&record.service),
            Dimension::DischargeReason => text(&record.discharge_reason),
            Dimension::Region => text(&record.region),
            Dimension::State => text(&record.state),
            Dimension::Period(granularity) => record
                .episode_end()
                .map(|end| GroupKey::Period(Period::from_date(end.date(), *granularity))),
        }
    }
}

/// Per-record quantity being aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    BilledCost,
    DirectCost,
    LengthOfStay,
    Age,
    /// Constant 1 per record.
    Encounters,
}

impl Metric {
    pub fn value(self, record: &Record) -> Option<f64> {
        match self {
            Metric::BilledCost => record.billed_cost,
            Metric::DirectCost => record.direct_cost,
            Metric::LengthOfStay => record.length_of_stay.map(|days| days as f64),
            Metric::Age => record.age.map(f64::from),
            Metric::Encounters => Some(1.0),
        }
    }
}

/// Ordering of the aggregated buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Sum,
    Mean,
    Count,
    Share,
    /// Ascending by key; periods in calendar order.
    Chronological,
}

impl SortKey {
    /// Bucket metric for descending sorts, `None` for key order.
    pub fn metric(self) -> Option<BucketMetric> {
        match self {
            SortKey::Sum => Some(BucketMetric::Sum),
            SortKey::Mean => Some(BucketMetric::Mean),
            SortKey::Count => Some(BucketMetric::Count),
            SortKey::Share => Some(BucketMetric::Share),
            SortKey::Chronological => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRequest {
    pub dimension: Dimension,
    pub metric: Metric,
    pub sort_by: SortKey,
    /// Applied after sorting.
    pub top_n: Option<usize>,
}

impl AggregateRequest {
    /// Sum of `metric` by `dimension`, largest first, untruncated.
    pub fn new(dimension: Dimension, metric: Metric) -> Self {
        Self {
            dimension,
            metric,
            sort_by: SortKey::Sum,
            top_n: None,
        }
    }

    #[must_use]
    pub fn sort_by(mut self, sort_by: SortKey) -> Self {
        self.sort_by = sort_by;
        self
    }

    #[must_use]
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum GroupKey {
    Text(String),
    Period(Period),
}

impl GroupKey {
    fn label(&self) -> String {
        match self {
            GroupKey::Text(text) => text.clone(),
            GroupKey::Period(period) => period.label(),
        }
    }
}

#[derive(Debug, Default)]
struct Accumulator {
    count: usize,
    values: Vec<f64>,
}

/// Groups `records` per `request`.
///
/// Records without a dimension value are skipped. Records with a null metric
/// count toward `count` but not toward `sum` or `mean`.
pub fn aggregate(records: &[Record], request: &AggregateRequest) -> Vec<AggregateBucket> {
    let mut groups: BTreeMap<GroupKey, Accumulator> = BTreeMap::new();
    for record in records {
        let Some(key) = request.dimension.key(record) else {
            continue;
        };
        let acc = groups.entry(key).or_default();
        acc.count += 1;
        if let Some(value) = request.metric.value(record).filter(|v| v.is_finite()) {
            acc.values.push(value);
        }
    }

    let grand_total: f64 = groups.values().flat_map(|acc| acc.values.iter()).sum();
    let mut buckets: Vec<AggregateBucket> = groups
        .into_iter()
        .map(|(key, acc)| {
            let contributing = acc.values.len();
            let sum = (contributing > 0).then(|| acc.values.iter().sum::<f64>());
            let percentage_of_total = sum
                .filter(|_| grand_total != 0.0)
                .map(|s| s / grand_total * 100.0);
            AggregateBucket {
                key: key.label(),
                sum,
                mean: mean(&acc.values),
                count: acc.count,
                contributing,
                percentage_of_total,
            }
        })
        .collect();

    if let Some(metric) = request.sort_by.metric() {
        sort_buckets(&mut buckets, metric);
    }
    if let Some(limit) = request.top_n {
        buckets.truncate(limit);
    }
    buckets
}

/// Sorts descending by `metric`, `None` last, ties by key.
pub fn sort_buckets(buckets: &mut [AggregateBucket], metric: BucketMetric) {
    buckets.sort_by(|a, b| {
        compare_desc(a.value(metric), b.value(metric)).then_with(|| a.key.cmp(&b.key))
    });
}

pub(crate) fn compare_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Summary of one aggregate unit (service, region, ...).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitProfile {
    pub unit: String,
    pub billed_total: f64,
    pub billed_mean: Option<f64>,
    pub encounters: usize,
    pub mean_stay: Option<f64>,
    /// Share of all billed cost, in percent.
    pub revenue_share: Option<f64>,
    /// Billed cost per month over the batch's month range, zero where the
    /// unit had no encounters.
    #[serde(skip)]
    pub monthly_billed: Vec<f64>,
}

/// Per-unit profiles ordered by billed total, largest first.
pub fn profile_units(records: &[Record], dimension: Dimension) -> Vec<UnitProfile> {
    let billed = aggregate(records, &AggregateRequest::new(dimension, Metric::BilledCost));
    let stays: BTreeMap<String, Option<f64>> = aggregate(
        records,
        &AggregateRequest::new(dimension, Metric::LengthOfStay),
    )
    .into_iter()
    .map(|bucket| (bucket.key, bucket.mean))
    .collect();
    let months = month_range(records);

    billed
        .into_iter()
        .map(|bucket| {
            let monthly_billed = monthly_billed(records, dimension, &bucket.key, &months);
            UnitProfile {
                billed_total: bucket.sum.unwrap_or(0.0),
                billed_mean: bucket.mean,
                encounters: bucket.count,
                mean_stay: stays.get(&bucket.key).copied().flatten(),
                revenue_share: bucket.percentage_of_total,
                monthly_billed,
                unit: bucket.key,
            }
        })
        .collect()
}

fn month_range(records: &[Record]) -> Vec<Period> {
    let mut months = records
        .iter()
        .filter_map(Record::episode_end)
        .map(|end| Period::from_date(end.date(), Granularity::Month));
    let Some(first) = months.next() else {
        return Vec::new();
    };
    let (start, end) = months.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));
    let mut range = vec![start];
    let mut current = start;
    while current < end {
        current = current.next();
        range.push(current);
    }
    range
}

fn monthly_billed(records: &[Record], dimension: Dimension, unit: &str, months: &[Period]) -> Vec<f64> {
    let mut totals = vec![0.0; months.len()];
    for record in records {
        if dimension.key(record).map(|key| key.label()).as_deref() != Some(unit) {
            continue;
        }
        let (Some(end), Some(cost)) = (record.episode_end(), record.billed_cost) else {
            continue;
        };
        let period = Period::from_date(end.date(), Granularity::Month);
        if let Ok(idx) = months.binary_search(&period) {
            totals[idx] += cost;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(service: Option<&str>, cost: Option<f64>) -> Record {
        Record {
            service: service.map(str::to_string),
            billed_cost: cost,
            ..Record::default()
        }
    }

    fn dated(day: (i32, u32, u32), cost: f64) -> Record {
        Record {
            closed_at: NaiveDate::from_ymd_opt(day.0, day.1, day.2)
                .and_then(|d| d.and_hms_opt(12, 0, 0)),
            billed_cost: Some(cost),
            service: Some("URGENCIAS".to_string()),
            ..Record::default()
        }
    }

    #[test]
    fn null_metric_counts_but_does_not_contribute() {
        let records = vec![
            record(Some("CIRUGIA"), Some(100.0)),
            record(Some("CIRUGIA"), None),
            record(Some("PEDIATRIA"), Some(300.0)),
            record(None, Some(1000.0)),
        ];
        let buckets = aggregate(
            &records,
            &AggregateRequest::new(Dimension::Service, Metric::BilledCost),
        );
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].key, "PEDIATRIA");
        assert_eq!(buckets[0].percentage_of_total, Some(75.0));
        let cirugia = &buckets[1];
        assert_eq!(cirugia.count, 2);
        assert_eq!(cirugia.contributing, 1);
        assert_eq!(cirugia.mean, Some(100.0));
        assert_eq!(cirugia.percentage_of_total, Some(25.0));
    }

    #[test]
    fn bucket_without_contributions_has_null_share_and_sorts_last() {
        let records = vec![
            record(Some("A"), None),
            record(Some("B"), Some(10.0)),
        ];
        let buckets = aggregate(
            &records,
            &AggregateRequest::new(Dimension::Service, Metric::BilledCost),
        );
        assert_eq!(buckets[0].key, "B");
        assert_eq!(buckets[1].key, "A");
        assert_eq!(buckets[1].sum, None);
        assert_eq!(buckets[1].percentage_of_total, None);
    }

    #[test]
    fn ties_break_by_key_and_top_n_applies_after_sort() {
        let records = vec![
            record(Some("C"), Some(5.0)),
            record(Some("A"), Some(5.0)),
            record(Some("B"), Some(9.0)),
        ];
        let request = AggregateRequest::new(Dimension::Service, Metric::BilledCost).top_n(2);
        let keys: Vec<_> = aggregate(&records, &request)
            .into_iter()
            .map(|b| b.key)
            .collect();
        assert_eq!(keys, vec!["B", "A"]);
    }

    #[test]
    fn periods_sort_chronologically() {
        let records = vec![
            dated((2025, 3, 1), 1.0),
            dated((2024, 12, 31), 50.0),
            dated((2025, 1, 15), 10.0),
        ];
        let request = AggregateRequest::new(Dimension::Period(Granularity::Month), Metric::BilledCost)
            .sort_by(SortKey::Chronological);
        let keys: Vec<_> = aggregate(&records, &request)
            .into_iter()
            .map(|b| b.key)
            .collect();
        assert_eq!(keys, vec!["2024-12", "2025-01", "2025-03"]);
    }

    #[test]
    fn empty_input_yields_no_buckets() {
        let request = AggregateRequest::new(Dimension::Region, Metric::Encounters);
        assert!(aggregate(&[], &request).is_empty());
    }

    #[test]
    fn unit_profiles_fill_month_gaps_with_zero() {
        let records = vec![dated((2025, 1, 10), 100.0), dated((2025, 3, 10), 300.0)];
        let profiles = profile_units(&records, Dimension::Service);
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].billed_total, 400.0);
        assert_eq!(profiles[0].monthly_billed, vec![100.0, 0.0, 300.0]);
        assert_eq!(profiles[0].revenue_share, Some(100.0));
    }
}
