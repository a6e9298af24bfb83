//! Streaming clustering of position-sorted anchors.
//!
//! [`AnchorClusterer`] keeps one open [`MateCluster`] per first-listed mobile-element category
//! and strand (category only for split reads), so anchors of both strands at one insertion
//! grow their own clusters side by side. A cluster closes when a record of its key fails its
//! window gate, or when the stream has moved past it. Closed clusters are filtered and, if they
//! pass, synthesized into named consensus records.

use log::{debug, warn};

use crate::cluster::{
    ClusterConfig, ConsensusRecord, FinalizedCluster, MateCluster, RejectReason, Rejection,
};
use crate::metrics::ClusteringMetrics;
use crate::mobile_tag::MobileTag;
use crate::record::{AlignmentRecord, Strand};

/// Default maximum distance between consecutive cluster members.
pub const DEFAULT_SEARCH_RADIUS: usize = 50;

/// Default prefix of consensus record names.
pub const DEFAULT_NAME_PREFIX: &str = "cluster";

/// Options controlling cluster boundaries and which clusters are emitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ClustererOptions {
    /// How far past the last member's start a record may start and still join.
    pub search_radius: usize,
    /// Clusters with fewer reads are dropped.
    pub min_reads: usize,
    /// Clusters whose mates spread over more chromosomes are dropped.
    pub max_mate_chromosomes: Option<usize>,
    /// Clusters with a lower share of mates on their most common chromosome are dropped.
    pub min_same_chromosome_pct: Option<f64>,
    /// Leave unmapped mates out of the mate-chromosome filters.
    pub skip_unmapped_mates: bool,
    /// Consensus records are named `{name_prefix}{n}`.
    pub name_prefix: String,
}

impl Default for ClustererOptions {
    fn default() -> Self {
        Self {
            search_radius: DEFAULT_SEARCH_RADIUS,
            min_reads: 1,
            max_mate_chromosomes: None,
            min_same_chromosome_pct: None,
            skip_unmapped_mates: false,
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
        }
    }
}

/// A consensus record with the name it is written under.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedConsensus {
    pub name: String,
    pub consensus: ConsensusRecord,
}

/// Why a finalized cluster was not emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClusterFilter {
    MinReads,
    MateChromosomes,
    SameChromosomePct,
}

/// Records sharing a key may join the same open cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClusterKey {
    category: String,
    /// `None` for split reads, which cluster regardless of strand.
    strand: Option<Strand>,
}

/// Whether a sorted stream positioned at `record` can no longer reach `cluster`.
fn is_passed(cluster: &MateCluster, record: &AlignmentRecord, search_radius: usize) -> bool {
    cluster.last().is_some_and(|last| {
        last.reference_name != record.reference_name || record.start > last.start + search_radius
    })
}

/// Folds a stream of anchors into consensus records.
///
/// Consensus records come out in the order their clusters close. Within one call they are in
/// the order the clusters were opened.
///
/// # Example
/// ```
/// use mecluster_lib::cluster::ClusterConfig;
/// use mecluster_lib::clusterer::{AnchorClusterer, ClustererOptions};
/// use mecluster_lib::record::AlignmentRecord;
///
/// let anchor = |start: usize| AlignmentRecord {
///     name: format!("UUread{start}"),
///     reference_name: "1".to_string(),
///     start,
///     end: start + 99,
///     mobile_tag: Some("L1".to_string()),
///     ..Default::default()
/// };
///
/// let mut clusterer = AnchorClusterer::new(ClusterConfig::default(), ClustererOptions::default());
/// assert!(clusterer.add(anchor(100)).is_empty());
/// assert!(clusterer.add(anchor(140)).is_empty());
/// let closed = clusterer.add(anchor(5_000));
/// assert_eq!(closed.len(), 1);
/// assert_eq!(closed[0].name, "cluster1");
/// assert_eq!(closed[0].consensus.member_count, 2);
/// assert_eq!(clusterer.finish()[0].name, "cluster2");
/// ```
#[derive(Debug)]
pub struct AnchorClusterer {
    config: ClusterConfig,
    options: ClustererOptions,
    open: Vec<(ClusterKey, MateCluster)>,
    metrics: ClusteringMetrics,
}

impl AnchorClusterer {
    #[must_use]
    pub fn new(config: ClusterConfig, options: ClustererOptions) -> Self {
        Self { config, options, open: Vec::new(), metrics: ClusteringMetrics::default() }
    }

    /// Adds the next anchor, returning the consensus of every emitted cluster it closed.
    ///
    /// A record whose mobile annotation cannot be decoded is counted and dropped before any
    /// window check, so it never closes a cluster.
    pub fn add(&mut self, record: AlignmentRecord) -> Vec<NamedConsensus> {
        self.metrics.total_records += 1;

        let tag = match MobileTag::from_record(&record) {
            Ok(tag) => tag,
            Err(e) => {
                warn!("Not adding read to cluster: {e}");
                self.metrics.invalid_mobile_tag_records += 1;
                return Vec::new();
            }
        };
        let key = ClusterKey {
            category: tag.into_first_category(),
            strand: (!self.config.split_read).then_some(record.strand),
        };

        let radius = self.options.search_radius;
        let emitted = self.close_where(|open_key, cluster| {
            if *open_key == key {
                !cluster.is_within_search_area(&record, radius)
            } else {
                is_passed(cluster, &record, radius)
            }
        });

        let rejected = if let Some(index) = self.open.iter().position(|(k, _)| *k == key) {
            self.open[index].1.add(record).err()
        } else {
            let mut cluster = MateCluster::new(self.config.clone());
            let rejected = cluster.add(record).err();
            if rejected.is_none() {
                self.open.push((key, cluster));
            }
            rejected
        };

        match rejected {
            Some(Rejection { reason: RejectReason::InvalidMobileTag(_), .. }) => {
                self.metrics.invalid_mobile_tag_records += 1;
            }
            Some(Rejection { record, reason: RejectReason::Incompatible }) => {
                warn!("Dropping read {} incompatible with its open cluster", record.name);
            }
            None => {}
        }
        emitted
    }

    /// Counts an anchor that was skipped because it has no alignment.
    pub fn skip_unmapped(&mut self) {
        self.metrics.total_records += 1;
        self.metrics.unmapped_records += 1;
    }

    /// Closes every open cluster, returning the consensus of those emitted.
    pub fn finish(&mut self) -> Vec<NamedConsensus> {
        let emitted = self.close_where(|_, _| true);
        self.metrics.finalize();
        emitted
    }

    /// Whether any cluster is open.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.open.is_empty()
    }

    /// Number of open clusters.
    #[must_use]
    pub fn open_clusters(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn metrics(&self) -> &ClusteringMetrics {
        &self.metrics
    }

    #[must_use]
    pub fn into_metrics(self) -> ClusteringMetrics {
        self.metrics
    }

    /// Closes the open clusters matching `done`, keeping the rest open in their order.
    fn close_where<F>(&mut self, mut done: F) -> Vec<NamedConsensus>
    where
        F: FnMut(&ClusterKey, &MateCluster) -> bool,
    {
        let (closed, open): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.open).into_iter().partition(|(key, cluster)| done(key, cluster));
        self.open = open;
        closed.into_iter().filter_map(|(_, cluster)| self.close(cluster)).collect()
    }

    fn close(&mut self, cluster: MateCluster) -> Option<NamedConsensus> {
        let finalized = cluster.finalize().ok()?;
        self.metrics.total_clusters += 1;

        if let Some(filter) = self.filter(&finalized) {
            debug!(
                "Dropping {} cluster of {} reads at {}: {filter:?}",
                finalized.dominant_category(),
                finalized.len(),
                finalized.start()
            );
            match filter {
                ClusterFilter::MinReads => self.metrics.filtered_min_reads += 1,
                ClusterFilter::MateChromosomes => self.metrics.filtered_mate_chromosomes += 1,
                ClusterFilter::SameChromosomePct => self.metrics.filtered_same_chromosome_pct += 1,
            }
            return None;
        }

        self.metrics.record_emitted(finalized.len());
        let name = format!("{}{}", self.options.name_prefix, self.metrics.emitted_clusters);
        Some(NamedConsensus { name, consensus: finalized.synthesize() })
    }

    fn filter(&self, cluster: &FinalizedCluster) -> Option<ClusterFilter> {
        let skip = self.options.skip_unmapped_mates;

        if cluster.len() < self.options.min_reads {
            return Some(ClusterFilter::MinReads);
        }
        if self.options.max_mate_chromosomes.is_some_and(|max| cluster.distinct_mate_chromosomes(skip) > max) {
            return Some(ClusterFilter::MateChromosomes);
        }
        if self
            .options
            .min_same_chromosome_pct
            .is_some_and(|min| cluster.highest_same_chromosome_percentage(skip) < min)
        {
            return Some(ClusterFilter::SameChromosomePct);
        }
        None
    }
}
