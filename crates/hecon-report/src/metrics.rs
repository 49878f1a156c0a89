//! The merged metrics document.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::Utc;
use hecon_analytics::forecast::{CostForecast, DemandForecast, FitQuality, Forecast};
use hecon_analytics::{
    AggregateRequest, AlertInput, Dimension, Metric, SEGMENTATION_METHOD, SegmentationSummary,
    SortKey, aggregate, cost_forecast, demand_forecast, generate_alerts, profile_units, segment,
    summarize,
};
use hecon_model::{AggregateBucket, Alert, Granularity, ParseWarnings, Record, Segment};
use serde::Serialize;

use crate::finite;
use crate::options::AnalysisOptions;
use crate::principal::{PrincipalMetrics, principal_metrics};
use crate::quality::{DataQuality, data_quality};

pub const METRICS_SCHEMA: &str = "hecon.metrics";
pub const METRICS_SCHEMA_VERSION: u32 = 1;

/// Per-dimension bucket lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdowns {
    /// Billed cost by service, largest first.
    pub services: Vec<AggregateBucket>,
    /// Encounters by discharge reason, most frequent first.
    pub discharge_reasons: Vec<AggregateBucket>,
    /// Encounters by municipality, most frequent first.
    pub regions: Vec<AggregateBucket>,
    pub states: Vec<AggregateBucket>,
}

/// One calendar month of the trend table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTrend {
    pub period: String,
    pub total_billed: Option<f64>,
    pub mean_billed: Option<f64>,
    pub encounters: usize,
    pub mean_stay_days: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forecasts {
    pub demand: Option<DemandForecast>,
    pub cost: Option<CostForecast>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clusters {
    pub dimension: &'static str,
    pub summary: SegmentationSummary,
    pub assignments: Vec<Segment>,
}

/// Fit summary of one forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitSummary {
    pub seasonality: &'static str,
    pub slope: f64,
    pub intercept: f64,
    pub n_points: usize,
    pub quality: FitQuality,
    pub degenerate: bool,
}

impl From<&Forecast> for FitSummary {
    fn from(forecast: &Forecast) -> Self {
        Self {
            seasonality: forecast.seasonality,
            slope: forecast.model.slope(),
            intercept: forecast.model.intercept(),
            n_points: forecast.model.n_points(),
            quality: FitQuality {
                mean_absolute_deviation: finite(forecast.quality.mean_absolute_deviation),
                r_squared: finite(forecast.quality.r_squared),
            },
            degenerate: forecast.degenerate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub forecast_strategy: &'static str,
    pub growth_estimator: &'static str,
    pub seed: u64,
    pub demand: Option<FitSummary>,
    pub cost: Option<FitSummary>,
    pub segmentation_method: &'static str,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HospitalMetrics {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    pub principal: PrincipalMetrics,
    pub breakdowns: Breakdowns,
    pub monthly_trend: Vec<MonthlyTrend>,
    pub forecasts: Forecasts,
    pub clusters: Clusters,
    pub alerts: Vec<Alert>,
    pub data_quality: DataQuality,
    pub model_summary: ModelSummary,
}

/// Runs every analysis over `records` and merges the results.
pub fn build_metrics(
    records: &[Record],
    warnings: &ParseWarnings,
    options: &AnalysisOptions,
) -> HospitalMetrics {
    let start = Instant::now();

    let breakdowns = breakdowns(records, options);
    let monthly_trend = monthly_trend(records);

    let demand = demand_forecast(
        records,
        options.demand_horizon_days,
        options.forecast_strategy,
    );
    let cost = cost_forecast(
        records,
        options.cost_horizon_months,
        options.forecast_strategy,
    );

    let unit_buckets = aggregate(
        records,
        &AggregateRequest::new(options.segment_by, Metric::BilledCost),
    );
    let assignments = segment(&unit_buckets, options.rank_by, options.n_clusters);
    let clusters = Clusters {
        dimension: options.segment_by.as_str(),
        summary: summarize(&assignments, options.n_clusters),
        assignments,
    };

    let units = profile_units(records, options.segment_by);
    let estimator = options.growth_estimator.build(options.seed);
    let alerts = generate_alerts(
        &AlertInput { records, units: &units },
        &options.thresholds,
        estimator.as_ref(),
    );

    let model_summary = ModelSummary {
        forecast_strategy: options.forecast_strategy.as_str(),
        growth_estimator: estimator.name(),
        seed: options.seed,
        demand: demand.as_ref().map(|d| FitSummary::from(&d.forecast)),
        cost: cost.as_ref().map(|c| FitSummary::from(&c.forecast)),
        segmentation_method: SEGMENTATION_METHOD,
    };

    let metrics = HospitalMetrics {
        schema: METRICS_SCHEMA,
        schema_version: METRICS_SCHEMA_VERSION,
        generated_at: Utc::now().to_rfc3339(),
        principal: principal_metrics(records, &options.thresholds.death_label),
        breakdowns,
        monthly_trend,
        forecasts: Forecasts { demand, cost },
        clusters,
        alerts,
        data_quality: data_quality(records, warnings),
        model_summary,
    };
    tracing::info!(
        records = records.len(),
        alerts = metrics.alerts.len(),
        clusters = metrics.clusters.summary.n_clusters,
        strategy = options.forecast_strategy.as_str(),
        duration_ms = start.elapsed().as_millis(),
        "metrics assembled"
    );
    metrics
}

fn breakdowns(records: &[Record], options: &AnalysisOptions) -> Breakdowns {
    // Billed totals per bucket, ranked by how many encounters fall in it.
    let by_count = |dimension: Dimension, limit: usize| {
        aggregate(
            records,
            &AggregateRequest::new(dimension, Metric::BilledCost)
                .sort_by(SortKey::Count)
                .top_n(limit),
        )
    };
    Breakdowns {
        services: aggregate(
            records,
            &AggregateRequest::new(Dimension::Service, Metric::BilledCost).top_n(options.top_n),
        ),
        discharge_reasons: by_count(Dimension::DischargeReason, options.top_n),
        regions: by_count(Dimension::Region, options.top_regions),
        states: by_count(Dimension::State, options.top_regions),
    }
}

fn monthly_trend(records: &[Record]) -> Vec<MonthlyTrend> {
    let month = Dimension::Period(Granularity::Month);
    let stays: BTreeMap<String, Option<f64>> = aggregate(
        records,
        &AggregateRequest::new(month, Metric::LengthOfStay),
    )
    .into_iter()
    .map(|bucket| (bucket.key, bucket.mean))
    .collect();

    aggregate(
        records,
        &AggregateRequest::new(month, Metric::BilledCost).sort_by(SortKey::Chronological),
    )
    .into_iter()
    .map(|bucket| MonthlyTrend {
        mean_stay_days: stays.get(&bucket.key).copied().flatten(),
        total_billed: bucket.sum,
        mean_billed: bucket.mean,
        encounters: bucket.count,
        period: bucket.key,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn encounter(month: u32, service: &str, cost: f64, stay: i64) -> Record {
        Record {
            closed_at: NaiveDate::from_ymd_opt(2025, month, 10).and_then(|d| d.and_hms_opt(7, 0, 0)),
            service: Some(service.to_string()),
            billed_cost: Some(cost),
            length_of_stay: Some(stay),
            ..Record::default()
        }
    }

    #[test]
    fn monthly_trend_is_chronological() {
        let records = vec![
            encounter(3, "A", 30.0, 3),
            encounter(1, "A", 10.0, 1),
            encounter(1, "B", 20.0, 5),
        ];
        let trend = monthly_trend(&records);
        let periods: Vec<_> = trend.iter().map(|row| row.period.as_str()).collect();
        assert_eq!(periods, vec!["2025-01", "2025-03"]);
        assert_eq!(trend[0].total_billed, Some(30.0));
        assert_eq!(trend[0].encounters, 2);
        assert_eq!(trend[0].mean_stay_days, Some(3.0));
    }

    #[test]
    fn reason_breakdown_carries_billed_totals() {
        let mut records = vec![
            encounter(1, "A", 100.0, 1),
            encounter(1, "A", 250.0, 2),
            encounter(2, "B", 40.0, 3),
        ];
        records[0].discharge_reason = Some("MEJORIA".to_string());
        records[1].discharge_reason = Some("MEJORIA".to_string());
        records[2].discharge_reason = Some("TRASLADO".to_string());
        records[2].region = Some("TLALPAN".to_string());

        let breakdowns = breakdowns(&records, &AnalysisOptions::default());

        let reason = &breakdowns.discharge_reasons[0];
        assert_eq!(reason.key, "MEJORIA");
        assert_eq!(reason.count, 2);
        assert_eq!(reason.sum, Some(350.0));
        assert_eq!(reason.mean, Some(175.0));
        assert_eq!(breakdowns.discharge_reasons[1].sum, Some(40.0));
        assert_eq!(breakdowns.regions[0].sum, Some(40.0));
        assert_eq!(breakdowns.regions[0].count, 1);
    }

    #[test]
    fn disabled_forecasts_are_absent() {
        let records = vec![encounter(1, "A", 10.0, 1), encounter(2, "A", 20.0, 1)];
        let options = AnalysisOptions {
            forecast_strategy: hecon_analytics::ForecastStrategy::Disabled,
            ..AnalysisOptions::default()
        };
        let metrics = build_metrics(&records, &ParseWarnings::default(), &options);
        assert!(metrics.forecasts.demand.is_none());
        assert!(metrics.forecasts.cost.is_none());
        assert!(metrics.model_summary.cost.is_none());
        assert_eq!(metrics.model_summary.forecast_strategy, "disabled");
    }
}
