//! Cluster aggregation of mobile-element anchor reads.
//!
//! A [`MateCluster`] grows one record at a time. Callers first ask whether a record lies in
//! the cluster's search area ([`MateCluster::is_within_search_area`]) and then offer it
//! ([`MateCluster::add`]), which applies the membership rules in [`validity`]. Once the
//! caller decides the cluster is complete, [`MateCluster::finalize`] turns it into a
//! [`FinalizedCluster`] whose statistics can be queried and which synthesizes exactly one
//! [`ConsensusRecord`].
//!
//! ```text
//! Empty --add--> Growing --add--> Growing --finalize--> FinalizedCluster --synthesize--> ConsensusRecord
//! ```

mod config;
pub mod consensus;
mod mate_cluster;
pub mod stats;
pub mod validity;
pub mod window;

pub use config::{ChromosomePrefix, ClusterConfig, DEFAULT_CHROMOSOME_PREFIX};
pub use consensus::ConsensusRecord;
pub use mate_cluster::{FinalizedCluster, MateCluster, RejectReason, Rejection};
pub use stats::{CategoryCounts, ClusterStatistics};
pub use window::WIGGLE;
