//! Metrics for the `cluster` command.

use serde::{Deserialize, Serialize};

use super::{Metric, ProcessingMetrics, serialize_float};

/// Counts gathered while folding anchors into clusters.
///
/// Record counts are anchors; cluster counts are finalized clusters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusteringMetrics {
    /// Anchor records read
    pub total_records: u64,

    /// Anchors that ended up in an emitted cluster
    pub clustered_records: u64,

    /// Anchors dropped because their mobile annotation could not be decoded
    pub invalid_mobile_tag_records: u64,

    /// Anchors skipped because they have no alignment
    pub unmapped_records: u64,

    /// Clusters finalized
    pub total_clusters: u64,

    /// Clusters written to the output
    pub emitted_clusters: u64,

    /// Clusters dropped for having too few reads
    pub filtered_min_reads: u64,

    /// Clusters dropped for having mates on too many chromosomes
    pub filtered_mate_chromosomes: u64,

    /// Clusters dropped for too few mates on a common chromosome
    pub filtered_same_chromosome_pct: u64,

    /// Mean number of reads per emitted cluster
    #[serde(serialize_with = "serialize_float")]
    pub mean_reads_per_cluster: f64,

    /// Largest number of reads in an emitted cluster
    pub max_reads_per_cluster: u64,
}

impl ClusteringMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an emitted cluster of `size` reads.
    pub fn record_emitted(&mut self, size: usize) {
        let size = size as u64;
        self.emitted_clusters += 1;
        self.clustered_records += size;
        self.max_reads_per_cluster = self.max_reads_per_cluster.max(size);
    }

    /// Computes the derived fields once counting is complete.
    pub fn finalize(&mut self) {
        self.mean_reads_per_cluster = if self.emitted_clusters == 0 {
            0.0
        } else {
            #[expect(clippy::cast_precision_loss, reason = "read counts never exceed 2^53")]
            let mean = self.clustered_records as f64 / self.emitted_clusters as f64;
            mean
        };
    }

    /// Clusters dropped by any filter.
    #[must_use]
    pub fn filtered_clusters(&self) -> u64 {
        self.filtered_min_reads + self.filtered_mate_chromosomes + self.filtered_same_chromosome_pct
    }
}

impl Metric for ClusteringMetrics {
    fn metric_name() -> &'static str {
        "clustering"
    }
}

impl ProcessingMetrics for ClusteringMetrics {
    fn total_input(&self) -> u64 {
        self.total_records
    }

    fn total_output(&self) -> u64 {
        self.clustered_records
    }

    fn total_filtered(&self) -> u64 {
        self.total_records.saturating_sub(self.clustered_records)
    }
}
