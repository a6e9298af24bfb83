//! SAM tags read from anchor records and written on consensus cluster records.
//!
//! Anchor records carry the mobile-element annotation ([`MOBILE`]) and, in single-sample
//! runs, a sample name ([`SAMPLE_NAME`]). Consensus records carry the cluster provenance
//! tags listed below.

use noodles::sam::alignment::record::data::field::Tag;

/// Mobile-element annotation of an anchor read (`ME:Z`).
pub const MOBILE: Tag = Tag::new(b'M', b'E');

/// Sample name attached to an anchor read (`SN:Z`).
pub const SAMPLE_NAME: Tag = Tag::new(b'S', b'N');

/// Read group of an anchor read (`RG:Z`).
pub const READ_GROUP: Tag = Tag::READ_GROUP;

/// Number of reads in the cluster (`CH:i`).
pub const CLUSTER_HITS: Tag = Tag::new(b'C', b'H');

/// Genomic span of the cluster in bases (`CL:i`).
pub const CLUSTER_LENGTH: Tag = Tag::new(b'C', b'L');

/// Dominant mobile-element category of the cluster (`MH:Z`).
pub const MOBILE_HIT: Tag = Tag::new(b'M', b'H');

/// Whether the cluster was built from split reads (`SP:Z`, `true`/`false`).
pub const SPLIT_CLUSTER: Tag = Tag::new(b'S', b'P');

/// Comma-separated names of the reads in the cluster (`RN:Z`).
pub const READ_NAMES: Tag = Tag::new(b'R', b'N');

/// Number of uniquely mapped anchors whose mate is uniquely mapped (`UU:i`).
pub const UNIQUE_HITS: Tag = Tag::new(b'U', b'U');

/// Number of uniquely mapped anchors whose mate maps to multiple locations (`UM:i`).
pub const MULTIPLE_HITS: Tag = Tag::new(b'U', b'M');

/// Number of uniquely mapped anchors whose mate is unmapped (`UX:i`).
pub const UNMAPPED_HITS: Tag = Tag::new(b'U', b'X');

/// Per-sample read counts, `sample=count` pairs joined by `", "` (`SC:Z`).
pub const SAMPLE_COUNT: Tag = Tag::new(b'S', b'C');
