//! The growing cluster and its finalized form.

use std::collections::BTreeMap;
use std::fmt;

use ahash::AHashMap;
use log::warn;

use super::config::ClusterConfig;
use super::consensus::{self, ConsensusRecord, cluster_end, cluster_start};
use super::stats::{self, CategoryCounts, ClusterStatistics};
use super::validity::is_compatible;
use super::window::is_within_window;
use crate::errors::{MeClusterError, Result};
use crate::mobile_tag::MobileTag;
use crate::record::AlignmentRecord;

/// Why an offered record was not added to a cluster.
#[derive(Debug, Clone, PartialEq)]
pub enum RejectReason {
    /// The record disagrees with the first member on reference, category or strand.
    Incompatible,
    /// The record's mobile annotation could not be decoded.
    InvalidMobileTag(MeClusterError),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Incompatible => write!(f, "incompatible with the cluster's first member"),
            Self::InvalidMobileTag(err) => write!(f, "{err}"),
        }
    }
}

/// A record refused by [`MateCluster::add`], handed back to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Rejection {
    /// The offered record.
    pub record: AlignmentRecord,
    /// Why it was refused.
    pub reason: RejectReason,
}

impl Rejection {
    /// Gives the refused record back.
    #[must_use]
    pub fn into_record(self) -> AlignmentRecord {
        self.record
    }
}

#[derive(Debug, Clone, Default)]
enum State {
    #[default]
    Empty,
    Growing {
        first_category: String,
    },
}

/// An append-only set of reads supporting one candidate insertion.
///
/// Every member agrees with the first on reference and first-listed mobile-element
/// category, and on strand unless the cluster is built from split reads.
///
/// # Examples
/// ```
/// use mecluster_lib::cluster::{ClusterConfig, MateCluster};
/// use mecluster_lib::record::AlignmentRecord;
///
/// let anchor = |name: &str, start: usize| AlignmentRecord {
///     name: name.to_string(),
///     reference_name: "1".to_string(),
///     start,
///     end: start + 99,
///     mobile_tag: Some("ALU".to_string()),
///     ..Default::default()
/// };
///
/// let mut cluster = MateCluster::new(ClusterConfig::default());
/// cluster.add(anchor("UUa", 1_000)).unwrap();
/// assert!(cluster.is_within_search_area(&anchor("UUb", 1_030), 50));
/// cluster.add(anchor("UUb", 1_030)).unwrap();
///
/// let consensus = cluster.finalize().unwrap().synthesize();
/// assert_eq!((consensus.start, consensus.end), (1_000, 1_129));
/// assert_eq!(consensus.reference_name, "chr1");
/// ```
#[derive(Debug, Clone)]
pub struct MateCluster {
    config: ClusterConfig,
    records: Vec<AlignmentRecord>,
    state: State,
}

impl MateCluster {
    /// Creates an empty cluster.
    #[must_use]
    pub fn new(config: ClusterConfig) -> Self {
        Self { config, records: Vec::new(), state: State::Empty }
    }

    /// The configuration the cluster was created with.
    #[must_use]
    pub fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Offers a record to the cluster.
    ///
    /// The first record is always accepted if its mobile annotation decodes. Later records
    /// must pass the membership rules against the first member. The window gate is not
    /// applied here; see [`MateCluster::is_within_search_area`].
    ///
    /// # Errors
    /// Returns the record inside a [`Rejection`] if it cannot join the cluster.
    pub fn add(&mut self, record: AlignmentRecord) -> std::result::Result<(), Rejection> {
        let tag = match MobileTag::from_record(&record) {
            Ok(tag) => tag,
            Err(err) => {
                warn!("Not adding read to cluster: {err}");
                return Err(Rejection { record, reason: RejectReason::InvalidMobileTag(err) });
            }
        };

        let compatible = match (&self.state, self.records.first()) {
            (State::Growing { first_category }, Some(first)) => is_compatible(
                first,
                first_category,
                &record,
                tag.first_category(),
                self.config.split_read,
            ),
            _ => true,
        };
        if !compatible {
            return Err(Rejection { record, reason: RejectReason::Incompatible });
        }

        if matches!(self.state, State::Empty) {
            self.state = State::Growing { first_category: tag.into_first_category() };
        }
        self.records.push(record);
        Ok(())
    }

    /// Whether `record` starts close enough to the last member to be offered.
    ///
    /// Always true for an empty cluster.
    #[must_use]
    pub fn is_within_search_area(&self, record: &AlignmentRecord, search_radius: usize) -> bool {
        self.records.last().is_none_or(|last| is_within_window(last, record, search_radius))
    }

    /// The first member.
    #[must_use]
    pub fn first(&self) -> Option<&AlignmentRecord> {
        self.records.first()
    }

    /// The most recently added member.
    #[must_use]
    pub fn last(&self) -> Option<&AlignmentRecord> {
        self.records.last()
    }

    /// Iterates over the members in the order they were added.
    pub fn iter(&self) -> std::slice::Iter<'_, AlignmentRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Closes the cluster to further members.
    ///
    /// # Errors
    /// Returns [`MeClusterError::EmptyCluster`] if no record was ever added.
    pub fn finalize(self) -> Result<FinalizedCluster> {
        match self.state {
            State::Growing { first_category } if !self.records.is_empty() => Ok(FinalizedCluster {
                config: self.config,
                records: self.records,
                dominant_category: first_category,
            }),
            _ => Err(MeClusterError::EmptyCluster),
        }
    }
}

impl<'a> IntoIterator for &'a MateCluster {
    type Item = &'a AlignmentRecord;
    type IntoIter = std::slice::Iter<'a, AlignmentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// A closed, non-empty cluster ready for statistics and synthesis.
#[derive(Debug, Clone)]
pub struct FinalizedCluster {
    config: ClusterConfig,
    records: Vec<AlignmentRecord>,
    dominant_category: String,
}

impl FinalizedCluster {
    /// The members in the order they were added.
    #[must_use]
    pub fn records(&self) -> &[AlignmentRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Always false; kept for symmetry with [`MateCluster::is_empty`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First-listed mobile-element category of the first member.
    #[must_use]
    pub fn dominant_category(&self) -> &str {
        &self.dominant_category
    }

    /// Start of the cluster span.
    #[must_use]
    pub fn start(&self) -> usize {
        cluster_start(&self.records, self.config.assume_sorted)
    }

    /// Inclusive end of the cluster span.
    #[must_use]
    pub fn end(&self) -> usize {
        cluster_end(&self.records)
    }

    /// Members per mate reference name.
    #[must_use]
    pub fn mate_distribution(&self, skip_unmapped: bool) -> AHashMap<&str, usize> {
        stats::mate_distribution(&self.records, skip_unmapped)
    }

    /// Share of counted mates on the most common mate reference, `100.0` with none counted.
    #[must_use]
    pub fn highest_same_chromosome_percentage(&self, skip_unmapped: bool) -> f64 {
        stats::highest_same_chromosome_percentage(&self.mate_distribution(skip_unmapped))
    }

    /// Number of distinct mate references.
    #[must_use]
    pub fn distinct_mate_chromosomes(&self, skip_unmapped: bool) -> usize {
        self.mate_distribution(skip_unmapped).len()
    }

    #[must_use]
    pub fn median_mapping_quality(&self) -> u8 {
        stats::median_mapping_quality(&self.records)
    }

    #[must_use]
    pub fn category_counts(&self) -> CategoryCounts {
        CategoryCounts::from_records(&self.records)
    }

    #[must_use]
    pub fn sample_counts(&self) -> BTreeMap<String, u32> {
        stats::sample_counts(&self.records, self.config.sample_mode)
    }

    /// All statistics at once.
    #[must_use]
    pub fn statistics(&self, skip_unmapped: bool) -> ClusterStatistics {
        ClusterStatistics::compute(&self.records, skip_unmapped, self.config.sample_mode)
    }

    /// Builds the consensus record, consuming the cluster.
    #[must_use]
    pub fn synthesize(self) -> ConsensusRecord {
        consensus::synthesize(self.records, self.dominant_category, &self.config)
    }
}
