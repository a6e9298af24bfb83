//! Integration tests for the read-names command.

use mecluster_lib::sam::builder::{RecordBuilder, create_header};
use std::fs;
use tempfile::TempDir;

use crate::helpers::{anchor, assert_success, run_mecluster, write_anchors};

fn run_read_names(extra: &[&str]) -> Vec<String> {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("anchors.bam");
    let output = dir.path().join("read_names.txt");
    let header = create_header(&[("1", 100_000), ("chrX", 100_000)], &[]);
    write_anchors(
        &input,
        &header,
        &[
            anchor("UUIIX-601_0003:5:62:3991:20675", 0, 1_000, false, "ALU").build(),
            anchor("UMread2", 1, 2_000, true, "L1").build(),
            RecordBuilder::new().name("UXread3").unmapped(true).build(),
        ],
    );

    let mut args = vec!["read-names", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()];
    args.extend_from_slice(extra);
    assert_success(&run_mecluster(&args));

    fs::read_to_string(&output).unwrap().lines().map(str::to_string).collect()
}

#[test]
fn test_read_names_default() {
    let lines = run_read_names(&[]);
    assert_eq!(
        lines,
        vec![
            "read_name\treference\tstart\tend\tmate_reference\tmate_start",
            "UUIIX-601_0003:5:62:3991:20675\t1\t1000\t1049\t1\t50000",
            "UMread2\tchrX\t2000\t2049\tchrX\t50000",
            "UXread3\t*\t\t\t*\t",
        ]
    );
}

#[test]
fn test_read_names_strip_prefix_and_auto_reference() {
    let lines = run_read_names(&["--prefix-length", "2", "--auto-prefix-reference"]);
    assert_eq!(lines[1], "IIX-601_0003:5:62:3991:20675\tchr1\t1000\t1049\tchr1\t50000");
    assert_eq!(lines[2], "read2\tchrX\t2000\t2049\tchrX\t50000");
    assert_eq!(lines[3], "read3\t*\t\t\t*\t");
}

#[test]
fn test_read_names_custom_reference_prefix() {
    let lines = run_read_names(&["--reference-prefix", "hs"]);
    assert_eq!(lines[1], "UUIIX-601_0003:5:62:3991:20675\ths1\t1000\t1049\ths1\t50000");
    assert_eq!(lines[2], "UMread2\thschrX\t2000\t2049\thschrX\t50000");
}
