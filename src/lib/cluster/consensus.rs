//! Synthesis of the single record representing a finalized cluster.

use std::collections::BTreeMap;

use itertools::Itertools;

use super::config::ClusterConfig;
use super::stats::{CategoryCounts, median_mapping_quality, sample_counts};
use crate::record::{AlignmentRecord, Strand};
use crate::sample::warn_unattributed;

/// The synthesized representative of one cluster.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsensusRecord {
    /// Normalized name of the reference the cluster lies on.
    pub reference_name: String,
    /// 1-based start of the cluster span.
    pub start: usize,
    /// 1-based inclusive end of the cluster span.
    pub end: usize,
    /// Number of bases spanned, `end - start + 1`.
    pub length: usize,
    /// Strand of the first member.
    pub strand: Strand,
    /// Median mapping quality of the members.
    pub mapping_quality: u8,
    /// Number of members.
    pub member_count: usize,
    /// First-listed mobile-element category of the first member.
    pub dominant_category: String,
    /// Whether the cluster was built from split reads.
    pub split_read: bool,
    /// Member read names in cluster order.
    pub read_names: Vec<String>,
    /// Members per mapping category.
    pub category_counts: CategoryCounts,
    /// Members per sample, ordered by sample name.
    pub sample_counts: BTreeMap<String, u32>,
}

impl ConsensusRecord {
    /// Member read names joined by commas.
    #[must_use]
    pub fn joined_read_names(&self) -> String {
        self.read_names.join(",")
    }

    /// Sample counts as `name=count` pairs joined by `", "`.
    #[must_use]
    pub fn sample_count_summary(&self) -> String {
        self.sample_counts.iter().map(|(sample, count)| format!("{sample}={count}")).join(", ")
    }
}

/// Start of the cluster span.
///
/// Sorted input puts the start on the first member; otherwise every member is scanned,
/// since the window gate accepts members that start slightly before their predecessor.
pub(crate) fn cluster_start(records: &[AlignmentRecord], assume_sorted: bool) -> usize {
    if assume_sorted {
        records.first().map_or(0, |r| r.start)
    } else {
        records.iter().map(|r| r.start).min().unwrap_or(0)
    }
}

/// Largest alignment end across the members.
pub(crate) fn cluster_end(records: &[AlignmentRecord]) -> usize {
    records.iter().map(|r| r.end).max().unwrap_or(0)
}

/// Folds a non-empty member set into its consensus record.
pub(crate) fn synthesize(
    records: Vec<AlignmentRecord>,
    dominant_category: String,
    config: &ClusterConfig,
) -> ConsensusRecord {
    let start = cluster_start(&records, config.assume_sorted);
    let end = cluster_end(&records);
    let mapping_quality = median_mapping_quality(&records);
    let category_counts = CategoryCounts::from_records(&records);
    let sample_counts = sample_counts(&records, config.sample_mode);
    warn_unattributed(&records, config.sample_mode);

    let (reference_name, strand) = records
        .first()
        .map(|first| {
            (config.chromosome_prefix.normalize(&first.reference_name).into_owned(), first.strand)
        })
        .unwrap_or_default();

    let member_count = records.len();
    let read_names = records.into_iter().map(|r| r.name).collect();

    ConsensusRecord {
        reference_name,
        start,
        end,
        length: end + 1 - start,
        strand,
        mapping_quality,
        member_count,
        dominant_category,
        split_read: config.split_read,
        read_names,
        category_counts,
        sample_counts,
    }
}
