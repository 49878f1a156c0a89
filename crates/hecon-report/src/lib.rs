//! Metrics assembly for hospital economics reporting.
//!
//! [`build_metrics`] runs aggregation, forecasting, segmentation and alerting
//! over one normalized batch and merges the results into a
//! [`HospitalMetrics`] document. Missing numbers serialize as `null`; the
//! JSON writer never emits NaN or infinities.

mod error;
mod metrics;
mod options;
mod principal;
mod quality;
mod writer;

pub use error::{ReportError, Result};
pub use metrics::{
    Breakdowns, Clusters, FitSummary, Forecasts, HospitalMetrics, METRICS_SCHEMA,
    METRICS_SCHEMA_VERSION, ModelSummary, MonthlyTrend, build_metrics,
};
pub use options::AnalysisOptions;
pub use principal::{DemographicMetrics, FinancialMetrics, OperationalMetrics, PrincipalMetrics};
pub use quality::DataQuality;
pub use writer::{to_json_string, write_json};

/// Drops non-finite values.
pub(crate) fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}
