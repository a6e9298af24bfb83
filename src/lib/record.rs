//! Anchor alignment records as seen by the clustering core.
//!
//! [`AlignmentRecord`] is a fully materialized, owned view of one anchor read: everything the
//! validity rules, window gate, statistics and consensus synthesis need, with reference
//! names already resolved against the header. Records are built once from BAM input with
//! [`AlignmentRecord::from_record_buf`] and never mutated afterwards.

use anyhow::{Result, bail};
use noodles::sam::Header;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value;

use crate::sample::SampleLookup;
use crate::tags;

/// Reference name used when a record has no (mate) reference sequence.
pub const NO_REFERENCE: &str = "*";

/// Mapping quality reported when a record's mapping quality is unavailable.
pub const MISSING_MAPPING_QUALITY: u8 = 255;

/// Strand orientation of an alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Strand {
    #[default]
    Plus,
    Minus,
}

impl Strand {
    #[must_use]
    pub fn is_negative(&self) -> bool {
        matches!(self, Strand::Minus)
    }
}

/// One anchor read offered to a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// Read name, including the mapping-category prefix.
    pub name: String,
    /// Name of the reference sequence the read aligns to.
    pub reference_name: String,
    /// 1-based alignment start.
    pub start: usize,
    /// 1-based inclusive alignment end.
    pub end: usize,
    /// Strand the read aligns to.
    pub strand: Strand,
    /// Mapping quality.
    pub mapping_quality: u8,
    /// Name of the reference sequence the mate aligns to.
    pub mate_reference_name: String,
    /// 1-based alignment start of the mate.
    pub mate_start: Option<usize>,
    /// Whether the mate is unmapped.
    pub mate_unmapped: bool,
    /// Sample of the read's read group, if it has one with an `SM` field.
    pub read_group_sample: Option<String>,
    /// Value of the sample-name tag, if present.
    pub sample_name: Option<String>,
    /// Raw mobile-element annotation, if present.
    pub mobile_tag: Option<String>,
}

impl AlignmentRecord {
    /// Builds an anchor record from a decoded BAM record.
    ///
    /// # Arguments
    /// * `record` - The decoded record
    /// * `header` - Header used to resolve reference sequence names
    /// * `samples` - Read group to sample lookup built from the same header
    ///
    /// # Errors
    /// Returns an error if the record has no alignment start.
    pub fn from_record_buf(
        record: &RecordBuf,
        header: &Header,
        samples: &SampleLookup,
    ) -> Result<Self> {
        let name = record.name().map(ToString::to_string).unwrap_or_default();

        let Some(start) = record.alignment_start().map(usize::from) else {
            bail!("Read '{name}' has no alignment start and cannot be clustered");
        };
        let end = record.alignment_end().map_or(start, usize::from);

        let flags = record.flags();
        let strand = if flags.is_reverse_complemented() { Strand::Minus } else { Strand::Plus };

        let read_group_sample = string_tag(record, tags::READ_GROUP)
            .and_then(|rg| samples.sample(&rg).map(str::to_string));

        Ok(Self {
            reference_name: reference_name(header, record.reference_sequence_id()),
            start,
            end,
            strand,
            mapping_quality: record.mapping_quality().map_or(MISSING_MAPPING_QUALITY, u8::from),
            mate_reference_name: reference_name(header, record.mate_reference_sequence_id()),
            mate_start: record.mate_alignment_start().map(usize::from),
            mate_unmapped: flags.is_mate_unmapped(),
            read_group_sample,
            sample_name: string_tag(record, tags::SAMPLE_NAME),
            mobile_tag: string_tag(record, tags::MOBILE),
            name,
        })
    }

    /// Whether the read aligns to the negative strand.
    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.strand.is_negative()
    }
}

/// Resolves a reference sequence ID to its name, or [`NO_REFERENCE`].
#[must_use]
pub fn reference_name(header: &Header, id: Option<usize>) -> String {
    id.and_then(|id| header.reference_sequences().get_index(id))
        .map_or_else(|| NO_REFERENCE.to_string(), |(name, _)| name.to_string())
}

fn string_tag(record: &RecordBuf, tag: Tag) -> Option<String> {
    match record.data().get(&tag) {
        Some(Value::String(value)) => Some(value.to_string()),
        _ => None,
    }
}
