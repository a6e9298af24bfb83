//! Builders for creating SAM/BAM records and headers in tests.
//!
//! ## Examples
//!
//! ```rust
//! use mecluster_lib::sam::builder::{RecordBuilder, create_header};
//!
//! let header = create_header(&[("chr1", 1_000_000)], &[("A", Some("NA12878"))]);
//! let anchor = RecordBuilder::mapped_read()
//!     .name("UUread1")
//!     .alignment_start(1_000)
//!     .cigar("100M")
//!     .tag("ME", "ALU;AluY")
//!     .tag("RG", "A")
//!     .build();
//!
//! assert_eq!(header.reference_sequences().len(), 1);
//! assert_eq!(anchor.reference_sequence_id(), Some(0));
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use anyhow::{Context, Result};
use bstr::BString;
use noodles::core::Position;
use noodles::sam::Header;
use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::record::Flags;
use noodles::sam::alignment::record::MappingQuality;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::data::field::Value as BufValue;
use noodles::sam::alignment::record_buf::{QualityScores, RecordBuf, Sequence};
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::header::tag as hd_tag;
use noodles::sam::header::record::value::map::read_group::tag as rg_tag;
use noodles::sam::header::record::value::map::{self, ReadGroup, ReferenceSequence};

pub const DEFAULT_BASE_QUALITY: u8 = 30;
pub const DEFAULT_MAPQ: u8 = 60;

/// Creates a coordinate-sorted header with the given reference sequences and read groups.
///
/// # Arguments
/// * `references` - `(name, length)` pairs, in dictionary order
/// * `read_groups` - `(id, sample)` pairs; a `None` sample leaves out the `SM` field
///
/// # Panics
/// Panics if a reference length is zero.
#[must_use]
pub fn create_header(references: &[(&str, usize)], read_groups: &[(&str, Option<&str>)]) -> Header {
    let hd = Map::<map::Header>::builder()
        .insert(hd_tag::SORT_ORDER, BString::from("coordinate"))
        .build()
        .expect("valid @HD record");
    let mut builder = Header::builder().set_header(hd);

    for (name, length) in references {
        let map = Map::<ReferenceSequence>::new(
            NonZeroUsize::new(*length).expect("reference length must be non-zero"),
        );
        builder = builder.add_reference_sequence(BString::from(*name), map);
    }

    for (id, sample) in read_groups {
        let mut rg = Map::<ReadGroup>::builder();
        if let Some(sample) = sample {
            rg = rg.insert(rg_tag::SAMPLE, String::from(*sample));
        }
        builder = builder.add_read_group(BString::from(*id), rg.build().expect("valid @RG record"));
    }

    builder.build()
}

/// Writes records to a BAM file.
///
/// # Errors
/// Returns an error if the file cannot be created or written.
pub fn write_bam(path: &Path, header: &Header, records: &[RecordBuf]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create BAM: {}", path.display()))?;
    let mut writer = noodles::bam::io::Writer::new(file);
    writer.write_header(header)?;

    for record in records {
        writer.write_alignment_record(header, record)?;
    }

    writer.try_finish()?;
    Ok(())
}

/// Parses a CIGAR string into operations.
///
/// # Panics
/// Panics on malformed CIGAR strings.
#[must_use]
pub fn parse_cigar(cigar_str: &str) -> Vec<Op> {
    let mut ops = Vec::new();
    let mut num_str = String::new();

    for c in cigar_str.chars() {
        if c.is_ascii_digit() {
            num_str.push(c);
        } else {
            let len: usize = num_str.parse().expect("Invalid CIGAR: expected number");
            let kind = match c {
                'M' => Kind::Match,
                'I' => Kind::Insertion,
                'D' => Kind::Deletion,
                'N' => Kind::Skip,
                'S' => Kind::SoftClip,
                'H' => Kind::HardClip,
                'P' => Kind::Pad,
                '=' => Kind::SequenceMatch,
                'X' => Kind::SequenceMismatch,
                _ => panic!("Unknown CIGAR operation: {c}"),
            };
            ops.push(Op::new(kind, len));
            num_str.clear();
        }
    }

    ops
}

/// Length of the read sequence implied by a CIGAR string.
fn cigar_read_length(cigar: &[Op]) -> usize {
    cigar
        .iter()
        .filter(|op| {
            matches!(
                op.kind(),
                Kind::Match
                    | Kind::Insertion
                    | Kind::SoftClip
                    | Kind::SequenceMatch
                    | Kind::SequenceMismatch
            )
        })
        .map(|op| op.len())
        .sum()
}

/// Builder for individual `RecordBuf`s.
///
/// When only a CIGAR is given, a sequence of matching length is generated, and when only a
/// sequence is given the CIGAR defaults to `{len}M`.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    name: Option<Vec<u8>>,
    flags: Flags,
    reference_sequence_id: Option<usize>,
    alignment_start: Option<usize>,
    mapping_quality: Option<u8>,
    cigar: Option<String>,
    sequence: Vec<u8>,
    tags: Vec<(Tag, BufValue)>,
    mate_reference_sequence_id: Option<usize>,
    mate_alignment_start: Option<usize>,
}

impl Default for RecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: None,
            flags: Flags::empty(),
            reference_sequence_id: None,
            alignment_start: None,
            mapping_quality: Some(DEFAULT_MAPQ),
            cigar: None,
            sequence: Vec::new(),
            tags: Vec::new(),
            mate_reference_sequence_id: None,
            mate_alignment_start: None,
        }
    }

    /// Creates a new builder for a read mapped to the first reference sequence.
    #[must_use]
    pub fn mapped_read() -> Self {
        Self { reference_sequence_id: Some(0), ..Self::new() }
    }

    /// Sets the read name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.as_bytes().to_vec());
        self
    }

    /// Sets the sequence.
    #[must_use]
    pub fn sequence(mut self, seq: &str) -> Self {
        self.sequence = seq.as_bytes().to_vec();
        self
    }

    /// Sets the unmapped flag.
    #[must_use]
    pub fn unmapped(mut self, unmapped: bool) -> Self {
        self.flags.set(Flags::UNMAPPED, unmapped);
        self
    }

    /// Sets the reverse complement flag.
    #[must_use]
    pub fn reverse_complement(mut self, reverse: bool) -> Self {
        self.flags.set(Flags::REVERSE_COMPLEMENTED, reverse);
        self
    }

    /// Sets the mate unmapped flag. Implies paired.
    #[must_use]
    pub fn mate_unmapped(mut self, unmapped: bool) -> Self {
        self.flags.set(Flags::SEGMENTED, true);
        self.flags.set(Flags::MATE_UNMAPPED, unmapped);
        self
    }

    /// Sets the reference sequence ID (0-based).
    #[must_use]
    pub fn reference_sequence_id(mut self, id: usize) -> Self {
        self.reference_sequence_id = Some(id);
        self
    }

    /// Sets the alignment start position (1-based).
    #[must_use]
    pub fn alignment_start(mut self, pos: usize) -> Self {
        self.alignment_start = Some(pos);
        self
    }

    /// Sets the mapping quality.
    #[must_use]
    pub fn mapping_quality(mut self, mapq: u8) -> Self {
        self.mapping_quality = Some(mapq);
        self
    }

    /// Sets the CIGAR string.
    #[must_use]
    pub fn cigar(mut self, cigar: &str) -> Self {
        self.cigar = Some(cigar.to_string());
        self
    }

    /// Sets the mate reference sequence ID (0-based). Implies paired.
    #[must_use]
    pub fn mate_reference_sequence_id(mut self, id: usize) -> Self {
        self.flags.set(Flags::SEGMENTED, true);
        self.mate_reference_sequence_id = Some(id);
        self
    }

    /// Sets the mate alignment start position (1-based).
    #[must_use]
    pub fn mate_alignment_start(mut self, pos: usize) -> Self {
        self.mate_alignment_start = Some(pos);
        self
    }

    /// Adds a SAM tag. Tags that are not exactly two characters are ignored.
    #[must_use]
    pub fn tag<V: Into<BufValue>>(mut self, tag: &str, value: V) -> Self {
        let tag_bytes = tag.as_bytes();
        if tag_bytes.len() == 2 {
            self.tags.push((Tag::from([tag_bytes[0], tag_bytes[1]]), value.into()));
        }
        self
    }

    /// Builds the `RecordBuf`.
    ///
    /// # Panics
    /// Panics if the alignment start is zero or the CIGAR is malformed.
    #[must_use]
    pub fn build(self) -> RecordBuf {
        let mut record = RecordBuf::default();

        if let Some(name) = self.name {
            *record.name_mut() = Some(name.into());
        }
        *record.flags_mut() = self.flags;

        *record.reference_sequence_id_mut() = self.reference_sequence_id;
        if let Some(pos) = self.alignment_start {
            *record.alignment_start_mut() =
                Some(Position::try_from(pos).expect("alignment_start must be >= 1"));
        }
        *record.mate_reference_sequence_id_mut() = self.mate_reference_sequence_id;
        if let Some(pos) = self.mate_alignment_start {
            *record.mate_alignment_start_mut() =
                Some(Position::try_from(pos).expect("mate_alignment_start must be >= 1"));
        }

        if let Some(mapq) = self.mapping_quality {
            *record.mapping_quality_mut() = MappingQuality::new(mapq);
        }

        let (ops, sequence) = match (self.cigar, self.sequence.is_empty()) {
            (Some(cigar), true) => {
                let ops = parse_cigar(&cigar);
                let len = cigar_read_length(&ops);
                let generated: Vec<u8> = b"ACGT".iter().copied().cycle().take(len).collect();
                (ops, generated)
            }
            (Some(cigar), false) => (parse_cigar(&cigar), self.sequence),
            (None, false) => {
                (vec![Op::new(Kind::Match, self.sequence.len())], self.sequence)
            }
            (None, true) => (Vec::new(), Vec::new()),
        };

        *record.cigar_mut() = ops.into_iter().collect();
        *record.quality_scores_mut() = QualityScores::from(vec![DEFAULT_BASE_QUALITY; sequence.len()]);
        *record.sequence_mut() = Sequence::from(sequence);

        for (tag, value) in self.tags {
            record.data_mut().insert(tag, value);
        }

        record
    }
}
