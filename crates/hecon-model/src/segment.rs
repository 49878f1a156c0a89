use std::fmt;

use serde::Serialize;

use crate::bucket::AggregateBucket;

/// Ordinal label of a rank band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterLabel {
    HighVolume,
    MediumHighVolume,
    MediumVolume,
    LowVolume,
    Specialized,
}

impl ClusterLabel {
    pub fn as_str(self) -> &'static str {
        match self {
            ClusterLabel::HighVolume => "high volume",
            ClusterLabel::MediumHighVolume => "medium-high volume",
            ClusterLabel::MediumVolume => "medium volume",
            ClusterLabel::LowVolume => "low volume",
            ClusterLabel::Specialized => "specialized",
        }
    }
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bucket with its assigned rank band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    pub bucket: AggregateBucket,
    pub cluster_id: usize,
    pub label: ClusterLabel,
}
