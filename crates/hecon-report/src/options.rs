use hecon_analytics::{AlertThresholds, Dimension, EstimatorKind, ForecastStrategy};
use hecon_model::BucketMetric;
use serde::{Deserialize, Serialize};

/// Knobs for one analysis run, read from the `[analysis]` config table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub forecast_strategy: ForecastStrategy,
    pub growth_estimator: EstimatorKind,
    /// Seed for the noise-based growth estimator.
    pub seed: u64,
    pub demand_horizon_days: usize,
    pub cost_horizon_months: usize,
    pub n_clusters: usize,
    /// Dimension whose units are segmented and profiled for predictive alerts.
    pub segment_by: Dimension,
    pub rank_by: BucketMetric,
    /// Length of the service and discharge-reason bucket lists.
    pub top_n: usize,
    /// Length of the region and state bucket lists.
    pub top_regions: usize,
    pub thresholds: AlertThresholds,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            forecast_strategy: ForecastStrategy::default(),
            growth_estimator: EstimatorKind::default(),
            seed: 42,
            demand_horizon_days: 30,
            cost_horizon_months: 6,
            n_clusters: 5,
            segment_by: Dimension::Service,
            rank_by: BucketMetric::Sum,
            top_n: 10,
            top_regions: 20,
            thresholds: AlertThresholds::default(),
        }
    }
}
