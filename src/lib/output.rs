//! Serialization of consensus records into BAM.
//!
//! Each cluster becomes one alignment record spanning the cluster, with an all-`N`
//! sequence, no base qualities and the cluster provenance carried in tags.

use anyhow::Result;
use bstr::BString;
use noodles::core::Position;
use noodles::sam::Header;
use noodles::sam::alignment::RecordBuf;
use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record::cigar::op::Kind;
use noodles::sam::alignment::record::{Flags, MappingQuality};
use noodles::sam::alignment::record_buf::data::field::Value;
use noodles::sam::alignment::record_buf::{Cigar, Data, QualityScores, Sequence};
use noodles::sam::header::record::value::Map;
use noodles::sam::header::record::value::map::header::tag as hd_tag;

use crate::cluster::{ChromosomePrefix, ConsensusRecord};
use crate::errors::MeClusterError;
use crate::header::{add_pg_record, normalize_reference_names};
use crate::tags;

/// Base used for every position of a consensus sequence.
const CONSENSUS_BASE: u8 = b'N';

fn count_value(count: usize) -> Value {
    Value::from(u32::try_from(count).unwrap_or(u32::MAX))
}

impl ConsensusRecord {
    /// Converts the consensus into a BAM record named `name`.
    ///
    /// # Errors
    /// Returns [`MeClusterError::ReferenceNotFound`] if the consensus reference is not in
    /// `header`, or an error if the start is not a valid position.
    pub fn to_record_buf(&self, name: &str, header: &Header) -> Result<RecordBuf> {
        let reference_sequence_id = header
            .reference_sequences()
            .get_index_of(self.reference_name.as_bytes())
            .ok_or_else(|| MeClusterError::ReferenceNotFound {
                ref_name: self.reference_name.clone(),
            })?;

        let flags = if self.strand.is_negative() { Flags::REVERSE_COMPLEMENTED } else { Flags::empty() };

        let data: Data = [
            (tags::CLUSTER_HITS, count_value(self.member_count)),
            (tags::CLUSTER_LENGTH, count_value(self.length)),
            (tags::MOBILE_HIT, Value::from(self.dominant_category.as_str())),
            (tags::SPLIT_CLUSTER, Value::from(if self.split_read { "true" } else { "false" })),
            (tags::READ_NAMES, Value::from(self.joined_read_names().as_str())),
            (tags::UNIQUE_HITS, Value::from(self.category_counts.unique)),
            (tags::MULTIPLE_HITS, Value::from(self.category_counts.multiple)),
            (tags::UNMAPPED_HITS, Value::from(self.category_counts.unmapped)),
            (tags::SAMPLE_COUNT, Value::from(self.sample_count_summary().as_str())),
        ]
        .into_iter()
        .collect();

        let mut builder = RecordBuf::builder()
            .set_name(BString::from(name))
            .set_flags(flags)
            .set_reference_sequence_id(reference_sequence_id)
            .set_alignment_start(Position::try_from(self.start)?)
            .set_cigar(Cigar::from(vec![Op::new(Kind::Match, self.length)]))
            .set_sequence(Sequence::from(vec![CONSENSUS_BASE; self.length]))
            .set_quality_scores(QualityScores::default())
            .set_data(data);

        if let Some(mapq) = MappingQuality::new(self.mapping_quality) {
            builder = builder.set_mapping_quality(mapq);
        }

        Ok(builder.build())
    }
}

/// Builds the header of the consensus output from the anchor input's header.
///
/// Reference names are normalized with `prefix`, read groups are kept, the sort order is
/// set to `unsorted` and a chained `@PG` record is appended.
///
/// # Errors
/// Returns an error if prefixing creates duplicate reference names or the `@PG` record
/// cannot be added.
pub fn build_output_header(
    input: &Header,
    prefix: &ChromosomePrefix,
    version: &str,
    command_line: &str,
) -> Result<Header> {
    let mut header = normalize_reference_names(input.clone(), prefix)?;

    let hd = Map::<noodles::sam::header::record::value::map::Header>::builder()
        .insert(hd_tag::SORT_ORDER, BString::from("unsorted"))
        .build()?;
    *header.header_mut() = Some(hd);

    add_pg_record(header, version, command_line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::CategoryCounts;
    use crate::record::Strand;
    use crate::sam::builder::create_header;
    use crate::sam::is_sorted;
    use noodles::sam::header::record::value::map::header::sort_order::{COORDINATE, UNSORTED};
    use std::collections::BTreeMap;

    fn consensus(strand: Strand) -> ConsensusRecord {
        ConsensusRecord {
            reference_name: "chr2".to_string(),
            start: 1_000,
            end: 1_149,
            length: 150,
            strand,
            mapping_quality: 37,
            member_count: 3,
            dominant_category: "ALU".to_string(),
            split_read: false,
            read_names: vec!["UUa".to_string(), "UMb".to_string(), "UXc".to_string()],
            category_counts: CategoryCounts { unique: 1, multiple: 1, unmapped: 1 },
            sample_counts: BTreeMap::from([("S2".to_string(), 1), ("S1".to_string(), 2)]),
        }
    }

    fn string_tag(record: &RecordBuf, tag: noodles::sam::alignment::record::data::field::Tag) -> String {
        match record.data().get(&tag) {
            Some(Value::String(value)) => value.to_string(),
            other => panic!("expected string tag, found {other:?}"),
        }
    }

    fn int_tag(record: &RecordBuf, tag: noodles::sam::alignment::record::data::field::Tag) -> i64 {
        record.data().get(&tag).and_then(Value::as_int).expect("integer tag")
    }

    #[test]
    fn test_to_record_buf() {
        let header = create_header(&[("chr1", 10_000), ("chr2", 10_000)], &[]);
        let record = consensus(Strand::Plus).to_record_buf("cluster1", &header).unwrap();

        assert_eq!(record.name().map(ToString::to_string).as_deref(), Some("cluster1"));
        assert_eq!(record.flags(), Flags::empty());
        assert_eq!(record.reference_sequence_id(), Some(1));
        assert_eq!(record.alignment_start().map(usize::from), Some(1_000));
        assert_eq!(record.alignment_end().map(usize::from), Some(1_149));
        assert_eq!(record.mapping_quality().map(u8::from), Some(37));
        assert_eq!(record.sequence().len(), 150);
        assert!(record.sequence().as_ref().iter().all(|&b| b == b'N'));
        assert!(record.quality_scores().is_empty());
        assert_eq!(record.mate_reference_sequence_id(), None);
        assert_eq!(record.mate_alignment_start(), None);
        assert_eq!(record.template_length(), 0);

        assert_eq!(int_tag(&record, tags::CLUSTER_HITS), 3);
        assert_eq!(int_tag(&record, tags::CLUSTER_LENGTH), 150);
        assert_eq!(string_tag(&record, tags::MOBILE_HIT), "ALU");
        assert_eq!(string_tag(&record, tags::SPLIT_CLUSTER), "false");
        assert_eq!(string_tag(&record, tags::READ_NAMES), "UUa,UMb,UXc");
        assert_eq!(int_tag(&record, tags::UNIQUE_HITS), 1);
        assert_eq!(int_tag(&record, tags::MULTIPLE_HITS), 1);
        assert_eq!(int_tag(&record, tags::UNMAPPED_HITS), 1);
        assert_eq!(string_tag(&record, tags::SAMPLE_COUNT), "S1=2, S2=1");
    }

    #[test]
    fn test_to_record_buf_reverse_and_missing_mapq() {
        let header = create_header(&[("chr2", 10_000)], &[]);
        let mut consensus = consensus(Strand::Minus);
        consensus.mapping_quality = 255;
        consensus.split_read = true;

        let record = consensus.to_record_buf("c", &header).unwrap();
        assert_eq!(record.flags(), Flags::REVERSE_COMPLEMENTED);
        assert_eq!(record.mapping_quality(), None);
        assert_eq!(string_tag(&record, tags::SPLIT_CLUSTER), "true");
    }

    #[test]
    fn test_to_record_buf_unknown_reference() {
        let header = create_header(&[("2", 10_000)], &[]);
        let err = consensus(Strand::Plus).to_record_buf("c", &header).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MeClusterError>(),
            Some(MeClusterError::ReferenceNotFound { ref_name }) if ref_name == "chr2"
        ));
    }

    #[test]
    fn test_build_output_header() {
        let input = create_header(&[("1", 1_000), ("2", 2_000)], &[("A", Some("S1"))]);
        assert!(is_sorted(&input, COORDINATE));

        let header = build_output_header(&input, &ChromosomePrefix::Auto, "0.1.0", "mecluster cluster").unwrap();
        let names: Vec<String> = header.reference_sequences().keys().map(ToString::to_string).collect();
        assert_eq!(names, vec!["chr1", "chr2"]);
        assert_eq!(header.read_groups().len(), 1);
        assert!(is_sorted(&header, UNSORTED));
        assert!(header.programs().as_ref().contains_key(b"mecluster".as_slice()));
    }
}
