use serde::{Deserialize, Serialize};

/// Derived value of an [`AggregateBucket`] used for ordering and ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketMetric {
    #[default]
    Sum,
    Mean,
    Count,
    Share,
}

/// Aggregated metric for one value of a grouping dimension.
///
/// `count` includes every row that carried the dimension value; `contributing`
/// only those whose metric was non-null. `sum`, `mean` and
/// `percentage_of_total` are `None` when nothing contributed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateBucket {
    pub key: String,
    pub sum: Option<f64>,
    pub mean: Option<f64>,
    pub count: usize,
    pub contributing: usize,
    pub percentage_of_total: Option<f64>,
}

impl AggregateBucket {
    pub fn value(&self, metric: BucketMetric) -> Option<f64> {
        match metric {
            BucketMetric::Sum => self.sum,
            BucketMetric::Mean => self.mean,
            BucketMetric::Count => Some(self.count as f64),
            BucketMetric::Share => self.percentage_of_total,
        }
    }
}
