//! Summary statistics over a cluster's members.
//!
//! Every function here is a pure fold over a member slice; nothing is cached, so the
//! results always reflect the records passed in.

use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::read_name::MappingCategory;
use crate::record::{AlignmentRecord, MISSING_MAPPING_QUALITY};
use crate::sample::{SampleMode, resolve_sample_name};

/// Number of members per mapping category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    /// Members whose mate maps uniquely (`UU`).
    pub unique: u32,
    /// Members whose mate maps to multiple locations (`UM`).
    pub multiple: u32,
    /// Members whose mate is unmapped (`UX`).
    pub unmapped: u32,
}

impl CategoryCounts {
    /// Tallies the mapping category of each record's name.
    #[must_use]
    pub fn from_records(records: &[AlignmentRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            counts.count(MappingCategory::classify(&record.name));
        }
        counts
    }

    fn count(&mut self, category: MappingCategory) {
        match category {
            MappingCategory::UniqueUnique => self.unique += 1,
            MappingCategory::UniqueMultiple => self.multiple += 1,
            MappingCategory::UniqueUnmapped => self.unmapped += 1,
            MappingCategory::Unclassified => {}
        }
    }
}

/// Counts members per mate reference name.
///
/// With `skip_unmapped`, members whose mate is unmapped are not counted.
#[must_use]
pub fn mate_distribution(records: &[AlignmentRecord], skip_unmapped: bool) -> AHashMap<&str, usize> {
    let mut distribution: AHashMap<&str, usize> = AHashMap::new();
    for record in records.iter().filter(|r| !(skip_unmapped && r.mate_unmapped)) {
        *distribution.entry(record.mate_reference_name.as_str()).or_insert(0) += 1;
    }
    distribution
}

/// Percentage of counted mates that align to the most common mate reference.
///
/// A distribution with no counted mates is treated as fully concordant and yields `100.0`.
#[must_use]
pub fn highest_same_chromosome_percentage(distribution: &AHashMap<&str, usize>) -> f64 {
    let total: usize = distribution.values().sum();
    if total == 0 {
        return 100.0;
    }
    let highest = distribution.values().copied().max().unwrap_or(0);
    highest as f64 / total as f64 * 100.0
}

/// Median of a set of mapping qualities, or `None` when empty.
///
/// For an even count the two central values are averaged and rounded down.
#[must_use]
pub fn median(values: &mut [u8]) -> Option<u8> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        let sum = u16::from(values[mid - 1]) + u16::from(values[mid]);
        u8::try_from(sum / 2).ok()
    }
}

/// Median mapping quality of the members, [`MISSING_MAPPING_QUALITY`] when there are none.
#[must_use]
pub fn median_mapping_quality(records: &[AlignmentRecord]) -> u8 {
    let mut qualities: Vec<u8> = records.iter().map(|r| r.mapping_quality).collect();
    median(&mut qualities).unwrap_or(MISSING_MAPPING_QUALITY)
}

/// Counts members per resolved sample name.
#[must_use]
pub fn sample_counts(records: &[AlignmentRecord], mode: SampleMode) -> BTreeMap<String, u32> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(resolve_sample_name(record, mode).into_owned()).or_insert(0) += 1;
    }
    counts
}

/// All statistics of a member set, computed in one pass per statistic.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterStatistics {
    /// Members per mate reference name.
    pub mate_distribution: BTreeMap<String, usize>,
    /// Share of counted mates on the most common mate reference, in percent.
    pub highest_same_chromosome_pct: f64,
    /// Number of distinct mate references.
    pub distinct_mate_chromosomes: usize,
    /// Median mapping quality of the members.
    pub median_mapping_quality: u8,
    /// Members per mapping category.
    pub category_counts: CategoryCounts,
    /// Members per sample.
    pub sample_counts: BTreeMap<String, u32>,
}

impl ClusterStatistics {
    /// Computes every statistic over `records`.
    #[must_use]
    pub fn compute(records: &[AlignmentRecord], skip_unmapped: bool, mode: SampleMode) -> Self {
        let distribution = mate_distribution(records, skip_unmapped);
        let highest_same_chromosome_pct = highest_same_chromosome_percentage(&distribution);
        let distinct_mate_chromosomes = distribution.len();

        Self {
            mate_distribution: distribution
                .into_iter()
                .map(|(name, count)| (name.to_string(), count))
                .collect(),
            highest_same_chromosome_pct,
            distinct_mate_chromosomes,
            median_mapping_quality: median_mapping_quality(records),
            category_counts: CategoryCounts::from_records(records),
            sample_counts: sample_counts(records, mode),
        }
    }
}
