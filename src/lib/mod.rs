#![deny(unsafe_code)]
// Clippy lint configuration for CI
// - cast_*: statistics and counters cast between numeric types
// - missing_*_doc: Documentation improvements tracked separately
// - needless_pass_by_value: Some APIs take ownership to hand records on
// - items_after_statements: Some test code uses late item declarations
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::items_after_statements,
    clippy::module_name_repetitions,
    clippy::uninlined_format_args
)]

//! # mecluster - Mobile Element Anchor Clustering Library
//!
//! This library groups position-sorted anchor reads, whose mates carry a mobile-element
//! annotation, into clusters that each support one candidate insertion, and summarizes each
//! cluster as a synthetic consensus alignment record.
//!
//! ## Overview
//!
//! ### Core Functionality
//!
//! - **[`cluster`]** - Cluster membership rules, window gate, statistics and consensus synthesis
//! - **[`clusterer`]** - Streaming driver that folds sorted anchors into named consensus records
//! - **[`mobile_tag`]** - Decoding of the mobile-element annotation carried by anchors
//! - **[`read_name`]** - Mapping-category prefixes of anchor read names
//! - **[`sample`]** - Sample attribution by read group or sample-name tag
//!
//! ### I/O
//!
//! - **[`record`]** - Owned anchor view built from BAM records
//! - **[`output`]** - Consensus records and header for the output BAM
//! - **[`bam_io`]** - BAM readers and writers
//! - **[`header`]** - `@PG` chaining and reference renaming
//! - **[`read_names`]** - Read-name TSV report
//!
//! ### Utilities
//!
//! - **[`validation`]** - Parameter and path validation
//! - **[`progress`]** - Progress logging
//! - **[`logging`]** - Formatting helpers and run summaries
//! - **[`metrics`]** - Metrics types and TSV writing
//!
//! ## Quick Start
//!
//! ```
//! use mecluster_lib::cluster::{ClusterConfig, MateCluster};
//! use mecluster_lib::record::AlignmentRecord;
//!
//! let anchor = |name: &str, start: usize| AlignmentRecord {
//!     name: name.to_string(),
//!     reference_name: "7".to_string(),
//!     start,
//!     end: start + 75,
//!     mapping_quality: 60,
//!     mobile_tag: Some("L1;L1HS".to_string()),
//!     ..Default::default()
//! };
//!
//! let mut cluster = MateCluster::new(ClusterConfig::default());
//! cluster.add(anchor("UUa", 5_000)).unwrap();
//! cluster.add(anchor("UXb", 5_020)).unwrap();
//!
//! let consensus = cluster.finalize().unwrap().synthesize();
//! assert_eq!(consensus.reference_name, "chr7");
//! assert_eq!(consensus.dominant_category, "L1");
//! assert_eq!(consensus.member_count, 2);
//! ```

pub mod bam_io;
pub mod cluster;
pub mod clusterer;
pub mod errors;
pub mod header;
pub mod logging;
pub mod metrics;
pub mod mobile_tag;
pub mod output;
pub mod progress;
pub mod read_name;
pub mod read_names;
pub mod record;
pub mod sam;
pub mod sample;
pub mod tags;
pub mod validation;

pub use cluster::{ClusterConfig, ConsensusRecord, FinalizedCluster, MateCluster};
pub use clusterer::{AnchorClusterer, ClustererOptions};
pub use errors::{MeClusterError, Result};
