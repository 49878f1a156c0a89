//! Analytics over normalized discharge records.
//!
//! Everything here is a pure function of its inputs. [`aggregate`] groups
//! records by a dimension; [`forecast`] fits linear trends and projects them
//! with seasonal factors; [`segment`] cuts ranked buckets into ordinal
//! bands; [`alerts`] applies threshold rules and a pluggable growth
//! estimator.
//!
//! ```no_run
//! use hecon_analytics::{AggregateRequest, Dimension, Metric, aggregate};
//! # let records: Vec<hecon_model::Record> = Vec::new();
//! let by_service = aggregate(
//!     &records,
//!     &AggregateRequest::new(Dimension::Service, Metric::BilledCost).top_n(10),
//! );
//! ```

mod aggregate;
pub mod alerts;
pub mod forecast;
mod segment;
pub mod stats;

pub use aggregate::{
    AggregateRequest, Dimension, Metric, SortKey, UnitProfile, aggregate, profile_units,
    sort_buckets,
};
pub use alerts::{AlertInput, AlertThresholds, EstimatorKind, GrowthEstimator, generate_alerts};
pub use forecast::{ForecastStrategy, cost_forecast, demand_forecast};
pub use segment::{SEGMENTATION_METHOD, SegmentationSummary, segment, summarize};
