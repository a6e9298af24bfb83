//! Read-name report: one TSV row per record with its alignment and mate positions.

use std::path::Path;

use anyhow::{Context, Result};
use fgoxide::io::DelimFile;
use noodles::sam::Header;
use noodles::sam::alignment::RecordBuf;
use serde::{Deserialize, Serialize};

use crate::cluster::ChromosomePrefix;
use crate::read_name::strip_prefix;
use crate::record::reference_name;

/// How read and reference names are rewritten in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadNameOptions {
    /// Number of leading characters removed from each read name.
    pub prefix_length: usize,
    /// Prefix rule applied to both reference columns.
    pub reference_prefix: ChromosomePrefix,
}

impl Default for ReadNameOptions {
    fn default() -> Self {
        Self { prefix_length: 0, reference_prefix: ChromosomePrefix::Keep }
    }
}

/// One row of the report. Positions are 1-based and empty when unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadNameRow {
    pub read_name: String,
    pub reference: String,
    pub start: Option<usize>,
    pub end: Option<usize>,
    pub mate_reference: String,
    pub mate_start: Option<usize>,
}

impl ReadNameRow {
    #[must_use]
    pub fn from_record_buf(record: &RecordBuf, header: &Header, options: &ReadNameOptions) -> Self {
        let name = record.name().map(ToString::to_string).unwrap_or_default();
        let reference = reference_name(header, record.reference_sequence_id());
        let mate_reference = reference_name(header, record.mate_reference_sequence_id());

        Self {
            read_name: strip_prefix(&name, options.prefix_length).to_string(),
            reference: options.reference_prefix.normalize(&reference).into_owned(),
            start: record.alignment_start().map(usize::from),
            end: record.alignment_end().map(usize::from),
            mate_reference: options.reference_prefix.normalize(&mate_reference).into_owned(),
            mate_start: record.mate_alignment_start().map(usize::from),
        }
    }
}

/// Writes the report rows to a TSV file with a header line.
///
/// # Errors
/// Returns an error if the file cannot be created or written to.
pub fn write_read_names<P: AsRef<Path>>(path: P, rows: &[ReadNameRow]) -> Result<()> {
    let path = path.as_ref();
    DelimFile::default()
        .write_tsv(&path, rows)
        .with_context(|| format!("Failed to write read names: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sam::builder::{RecordBuilder, create_header};
    use rstest::rstest;
    use tempfile::NamedTempFile;

    fn paired_record() -> RecordBuf {
        RecordBuilder::mapped_read()
            .name("UUIIX-601_0003:5:62:3991:20675")
            .reference_sequence_id(0)
            .alignment_start(1_000)
            .cigar("50M")
            .mate_reference_sequence_id(1)
            .mate_alignment_start(20_000)
            .build()
    }

    #[rstest]
    #[case::keep(0, ChromosomePrefix::Keep, "UUIIX-601_0003:5:62:3991:20675", "1", "X")]
    #[case::strip(2, ChromosomePrefix::Keep, "IIX-601_0003:5:62:3991:20675", "1", "X")]
    #[case::auto(2, ChromosomePrefix::Auto, "IIX-601_0003:5:62:3991:20675", "chr1", "chrX")]
    #[case::custom(0, ChromosomePrefix::Custom("hs".to_string()), "UUIIX-601_0003:5:62:3991:20675", "hs1", "hsX")]
    fn test_from_record_buf(
        #[case] prefix_length: usize,
        #[case] reference_prefix: ChromosomePrefix,
        #[case] read_name: &str,
        #[case] reference: &str,
        #[case] mate_reference: &str,
    ) {
        let header = create_header(&[("1", 100_000), ("X", 100_000)], &[]);
        let options = ReadNameOptions { prefix_length, reference_prefix };

        let row = ReadNameRow::from_record_buf(&paired_record(), &header, &options);
        assert_eq!(row.read_name, read_name);
        assert_eq!(row.reference, reference);
        assert_eq!((row.start, row.end), (Some(1_000), Some(1_049)));
        assert_eq!(row.mate_reference, mate_reference);
        assert_eq!(row.mate_start, Some(20_000));
    }

    #[test]
    fn test_unmapped_record() {
        let header = create_header(&[("1", 100_000)], &[]);
        let record = RecordBuilder::new().name("UXread").unmapped(true).build();
        let options = ReadNameOptions { prefix_length: 0, reference_prefix: ChromosomePrefix::Auto };

        let row = ReadNameRow::from_record_buf(&record, &header, &options);
        assert_eq!(row.reference, "*");
        assert_eq!(row.mate_reference, "*");
        assert_eq!((row.start, row.end, row.mate_start), (None, None, None));
    }

    #[test]
    fn test_write_read_names() -> Result<()> {
        let header = create_header(&[("1", 100_000), ("X", 100_000)], &[]);
        let row = ReadNameRow::from_record_buf(&paired_record(), &header, &ReadNameOptions::default());

        let file = NamedTempFile::new()?;
        write_read_names(file.path(), std::slice::from_ref(&row))?;

        let content = std::fs::read_to_string(file.path())?;
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("read_name\treference\tstart\tend\tmate_reference\tmate_start")
        );
        assert_eq!(
            lines.next(),
            Some("UUIIX-601_0003:5:62:3991:20675\t1\t1000\t1049\tX\t20000")
        );

        let back: Vec<ReadNameRow> = DelimFile::default().read_tsv(&file.path())?;
        assert_eq!(back, vec![row]);
        Ok(())
    }
}
