//! Rank-band segmentation of aggregate buckets.
//!
//! Buckets are ranked by a metric and cut into equal-sized ordinal bands.
//! This is percentile segmentation, not distance-based clustering.

use hecon_model::{AggregateBucket, BucketMetric, ClusterLabel, Segment};
use serde::Serialize;

use crate::aggregate::sort_buckets;

pub const SEGMENTATION_METHOD: &str = "rank bands over the ranking metric";

const POSITIONAL_LABELS: [ClusterLabel; 4] = [
    ClusterLabel::HighVolume,
    ClusterLabel::MediumHighVolume,
    ClusterLabel::MediumVolume,
    ClusterLabel::LowVolume,
];

/// Assigns each bucket to one of `n_clusters` bands, highest values first.
///
/// Band size is `ceil(buckets / n_clusters)`. With fewer buckets than bands,
/// each bucket gets its own band and the trailing bands stay empty. The last
/// configured band of a multi-band segmentation is labelled
/// [`ClusterLabel::Specialized`]. `n_clusters == 0` is treated as 1.
pub fn segment(buckets: &[AggregateBucket], rank_by: BucketMetric, n_clusters: usize) -> Vec<Segment> {
    if buckets.is_empty() {
        return Vec::new();
    }
    let n_clusters = n_clusters.max(1);
    let band_size = buckets.len().div_ceil(n_clusters);

    let mut ranked = buckets.to_vec();
    sort_buckets(&mut ranked, rank_by);
    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, bucket)| {
            let cluster_id = rank / band_size;
            Segment {
                bucket,
                cluster_id,
                label: label_for(cluster_id, n_clusters),
            }
        })
        .collect()
}

fn label_for(cluster_id: usize, n_clusters: usize) -> ClusterLabel {
    if n_clusters > 1 && cluster_id == n_clusters - 1 {
        return ClusterLabel::Specialized;
    }
    POSITIONAL_LABELS[cluster_id.min(POSITIONAL_LABELS.len() - 1)]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentationSummary {
    pub n_clusters: usize,
    pub n_units: usize,
    pub method: &'static str,
    pub members_per_cluster: Vec<usize>,
    /// Fewer units than clusters; some bands are empty.
    pub degenerate: bool,
}

pub fn summarize(segments: &[Segment], n_clusters: usize) -> SegmentationSummary {
    let n_clusters = n_clusters.max(1);
    let mut members_per_cluster = vec![0; n_clusters];
    for segment in segments {
        if let Some(slot) = members_per_cluster.get_mut(segment.cluster_id) {
            *slot += 1;
        }
    }
    SegmentationSummary {
        n_clusters,
        n_units: segments.len(),
        method: SEGMENTATION_METHOD,
        members_per_cluster,
        degenerate: segments.len() < n_clusters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bucket(key: &str, sum: f64) -> AggregateBucket {
        AggregateBucket {
            key: key.to_string(),
            sum: Some(sum),
            mean: Some(sum),
            count: 1,
            contributing: 1,
            percentage_of_total: None,
        }
    }

    #[test]
    fn twenty_five_buckets_into_five_bands() {
        let buckets: Vec<_> = (0..25)
            .map(|i| bucket(&format!("S{i:02}"), f64::from(i)))
            .collect();
        let segments = segment(&buckets, BucketMetric::Sum, 5);
        let summary = summarize(&segments, 5);
        assert_eq!(summary.members_per_cluster, vec![5, 5, 5, 5, 5]);
        assert_eq!(segments[0].bucket.key, "S24");
        assert_eq!(segments[0].cluster_id, 0);
        assert_eq!(segments[0].label, ClusterLabel::HighVolume);
        assert_eq!(segments[24].label, ClusterLabel::Specialized);
        assert_eq!(segments[10].label, ClusterLabel::MediumVolume);
    }

    #[test]
    fn fewer_buckets_than_clusters() {
        let buckets = vec![bucket("A", 3.0), bucket("B", 2.0)];
        let segments = segment(&buckets, BucketMetric::Sum, 5);
        let ids: Vec<_> = segments.iter().map(|s| s.cluster_id).collect();
        assert_eq!(ids, vec![0, 1]);
        let summary = summarize(&segments, 5);
        assert!(summary.degenerate);
        assert_eq!(summary.members_per_cluster, vec![1, 1, 0, 0, 0]);
    }

    #[test]
    fn zero_clusters_means_one_band() {
        let buckets = vec![bucket("A", 3.0), bucket("B", 2.0)];
        let segments = segment(&buckets, BucketMetric::Sum, 0);
        assert!(segments.iter().all(|s| s.cluster_id == 0));
        assert!(segments.iter().all(|s| s.label == ClusterLabel::HighVolume));
    }

    #[test]
    fn null_values_rank_last() {
        let mut empty = bucket("A", 0.0);
        empty.sum = None;
        let segments = segment(&[empty, bucket("B", 1.0)], BucketMetric::Sum, 2);
        assert_eq!(segments[0].bucket.key, "B");
        assert_eq!(segments[1].label, ClusterLabel::Specialized);
    }
}
