//! Sample attribution of anchor reads.
//!
//! In multi-sample runs the sample of a read comes from its read group (`@RG SM`). In
//! single-sample runs it comes from the sample-name tag written on each anchor upstream.
//! Reads whose sample cannot be resolved are attributed to a sentinel name and a warning is
//! logged; losing one read's attribution never blocks clustering.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use log::warn;
use noodles::sam::Header;
use noodles::sam::header::record::value::map::read_group::tag as rg_tag;

use crate::record::AlignmentRecord;

/// Sample name used for reads without a resolvable read group in multi-sample mode.
pub const NO_READ_GROUP: &str = "NoRG";

/// Sample name used for reads without a sample-name tag in single-sample mode.
pub const NO_SAMPLE_NAME: &str = "NoSample";

/// How the sample of each read is determined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleMode {
    /// Use the sample-name tag carried by each read.
    #[default]
    Single,
    /// Use the `SM` field of the read's `@RG` header line.
    Multi,
}

impl FromStr for SampleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "multi" => Ok(Self::Multi),
            other => Err(format!("unknown sample mode '{other}' (expected 'single' or 'multi')")),
        }
    }
}

impl fmt::Display for SampleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Multi => write!(f, "multi"),
        }
    }
}

/// Lookup from read group ID to sample name built from the `@RG` header lines.
///
/// Read groups without an `SM` field are left out, so their reads resolve to
/// [`NO_READ_GROUP`].
#[derive(Debug, Clone, Default)]
pub struct SampleLookup {
    samples: HashMap<String, String>,
}

impl SampleLookup {
    /// Builds the lookup from a SAM header.
    #[must_use]
    pub fn from_header(header: &Header) -> Self {
        let samples = header
            .read_groups()
            .iter()
            .filter_map(|(id, rg)| {
                rg.other_fields().get(&rg_tag::SAMPLE).map(|sm| (id.to_string(), sm.to_string()))
            })
            .collect();

        Self { samples }
    }

    /// Returns the sample name for a read group ID.
    #[must_use]
    pub fn sample(&self, read_group_id: &str) -> Option<&str> {
        self.samples.get(read_group_id).map(String::as_str)
    }

    /// Number of read groups with a sample name.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no read group has a sample name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// The sample recorded on a read, if any.
#[must_use]
pub fn sample_name(record: &AlignmentRecord, mode: SampleMode) -> Option<&str> {
    match mode {
        SampleMode::Multi => record.read_group_sample.as_deref(),
        SampleMode::Single => record.sample_name.as_deref(),
    }
}

/// Resolves the sample a read is attributed to.
///
/// Falls back to [`NO_READ_GROUP`] (multi) or [`NO_SAMPLE_NAME`] (single) when the read
/// carries no usable sample information. Nothing is logged here; see [`warn_unattributed`].
#[must_use]
pub fn resolve_sample_name(record: &AlignmentRecord, mode: SampleMode) -> Cow<'_, str> {
    match (sample_name(record, mode), mode) {
        (Some(sample), _) => Cow::Borrowed(sample),
        (None, SampleMode::Multi) => Cow::Borrowed(NO_READ_GROUP),
        (None, SampleMode::Single) => Cow::Borrowed(NO_SAMPLE_NAME),
    }
}

/// Logs one warning per read attributed to a sentinel sample, returning how many there were.
pub fn warn_unattributed(records: &[AlignmentRecord], mode: SampleMode) -> usize {
    let mut missing = 0;
    for record in records.iter().filter(|r| sample_name(r, mode).is_none()) {
        match mode {
            SampleMode::Multi => warn!(
                "Multi-sample mode enabled but read has no read group sample, counting it as '{NO_READ_GROUP}': {}",
                record.name
            ),
            SampleMode::Single => warn!(
                "Read has no sample name tag, counting it as '{NO_SAMPLE_NAME}': {}",
                record.name
            ),
        }
        missing += 1;
    }
    missing
}
