//! Helper utilities for integration tests.

#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use mecluster_lib::sam::builder::{RecordBuilder, write_bam};
use noodles::bam;
use noodles::sam::Header;
use noodles::sam::alignment::record::data::field::Tag;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::alignment::record_buf::data::field::Value;

/// Builds a 50bp anchor read carrying a mobile-element annotation, its mate on the same reference.
pub fn anchor(name: &str, reference_id: usize, start: usize, reverse: bool, mobile: &str) -> RecordBuilder {
    RecordBuilder::mapped_read()
        .name(name)
        .reference_sequence_id(reference_id)
        .alignment_start(start)
        .cigar("50M")
        .reverse_complement(reverse)
        .mate_reference_sequence_id(reference_id)
        .mate_alignment_start(50_000)
        .tag("ME", mobile)
}

/// Writes records to a BAM file, panicking on failure.
pub fn write_anchors(path: &Path, header: &Header, records: &[RecordBuf]) {
    write_bam(path, header, records).expect("Failed to write input BAM");
}

/// Reads the header and all records of a BAM file.
pub fn read_bam(path: &Path) -> (Header, Vec<RecordBuf>) {
    let mut reader = bam::io::reader::Builder.build_from_path(path).expect("Failed to open BAM");
    let header = reader.read_header().expect("Failed to read header");
    let records =
        reader.record_bufs(&header).map(|r| r.expect("Failed to read record")).collect();
    (header, records)
}

/// Runs the mecluster binary with the given arguments.
pub fn run_mecluster(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mecluster"))
        .args(args)
        .output()
        .expect("Failed to run mecluster")
}

/// Asserts that a command exited successfully, showing its stderr otherwise.
pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "mecluster failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Value of a string tag.
///
/// # Panics
///
/// Panics if the tag is missing or not a string.
pub fn string_tag(record: &RecordBuf, tag: [u8; 2]) -> String {
    match record.data().get(&Tag::from(tag)) {
        Some(Value::String(s)) => s.to_string(),
        other => panic!("Expected string tag {:?}, got {other:?}", std::str::from_utf8(&tag)),
    }
}

/// Value of an integer tag.
///
/// # Panics
///
/// Panics if the tag is missing or not an integer.
pub fn int_tag(record: &RecordBuf, tag: [u8; 2]) -> i64 {
    record
        .data()
        .get(&Tag::from(tag))
        .and_then(Value::as_int)
        .unwrap_or_else(|| panic!("Expected integer tag {:?}", std::str::from_utf8(&tag)))
}

/// Name of the reference sequence a record aligns to.
pub fn reference_name(header: &Header, record: &RecordBuf) -> String {
    record
        .reference_sequence_id()
        .and_then(|id| header.reference_sequences().get_index(id))
        .map(|(name, _)| name.to_string())
        .expect("Record should be placed on a reference")
}
