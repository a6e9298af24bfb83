//! Integration tests for the cluster command.

use fgoxide::io::DelimFile;
use mecluster_lib::metrics::ClusteringMetrics;
use mecluster_lib::sam::builder::{RecordBuilder, create_header};
use mecluster_lib::sam::is_sorted;
use noodles::sam::alignment::record_buf::RecordBuf;
use noodles::sam::header::record::value::map::header::sort_order::UNSORTED;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::helpers::{
    anchor, assert_success, int_tag, read_bam, reference_name, run_mecluster, string_tag,
    write_anchors,
};

/// Anchors forming an ALU cluster and an L1 cluster on "1" and an SVA singleton on "2",
/// followed by one unmapped read.
fn standard_anchors() -> Vec<RecordBuf> {
    vec![
        anchor("UUa", 0, 1_000, false, "ALU;AluY").build(),
        anchor("UMb", 0, 1_020, false, "ALU,L1").build(),
        anchor("UXc", 0, 1_040, false, "ALU").mate_unmapped(true).build(),
        anchor("UUd", 0, 5_000, true, "L1").build(),
        anchor("UUe", 0, 5_010, true, "L1;L1HS").build(),
        anchor("UUf", 1, 300, false, "SVA").build(),
        RecordBuilder::new().name("UUg").unmapped(true).tag("ME", "ALU").build(),
    ]
}

fn write_standard_input(dir: &Path) -> PathBuf {
    let input = dir.join("anchors.bam");
    let header = create_header(&[("1", 100_000), ("2", 100_000)], &[]);
    write_anchors(&input, &header, &standard_anchors());
    input
}

fn run_cluster(input: &Path, output: &Path, extra: &[&str]) {
    let mut args = vec!["cluster", "-i", input.to_str().unwrap(), "-o", output.to_str().unwrap()];
    args.extend_from_slice(extra);
    assert_success(&run_mecluster(&args));
}

#[test]
fn test_cluster_basic() {
    let dir = TempDir::new().unwrap();
    let input = write_standard_input(dir.path());
    let output = dir.path().join("clusters.bam");

    run_cluster(&input, &output, &[]);

    let (header, records) = read_bam(&output);
    assert_eq!(records.len(), 3);

    let names: Vec<String> = records.iter().map(|r| r.name().unwrap().to_string()).collect();
    assert_eq!(names, vec!["cluster1", "cluster2", "cluster3"]);

    let alu = &records[0];
    assert_eq!(reference_name(&header, alu), "chr1");
    assert_eq!(alu.alignment_start().map(usize::from), Some(1_000));
    assert!(!alu.flags().is_reverse_complemented());
    assert_eq!(alu.mapping_quality().map(u8::from), Some(60));
    assert_eq!(int_tag(alu, *b"CH"), 3);
    assert_eq!(int_tag(alu, *b"CL"), 90);
    assert_eq!(alu.sequence().len(), 90);
    assert_eq!(string_tag(alu, *b"MH"), "ALU");
    assert_eq!(string_tag(alu, *b"SP"), "false");
    assert_eq!(string_tag(alu, *b"RN"), "UUa,UMb,UXc");
    assert_eq!((int_tag(alu, *b"UU"), int_tag(alu, *b"UM"), int_tag(alu, *b"UX")), (1, 1, 1));
    assert_eq!(string_tag(alu, *b"SC"), "NoSample=3");

    let l1 = &records[1];
    assert!(l1.flags().is_reverse_complemented());
    assert_eq!(l1.alignment_start().map(usize::from), Some(5_000));
    assert_eq!(int_tag(l1, *b"CL"), 60);
    assert_eq!(string_tag(l1, *b"MH"), "L1");
    assert_eq!(string_tag(l1, *b"RN"), "UUd,UUe");

    let sva = &records[2];
    assert_eq!(reference_name(&header, sva), "chr2");
    assert_eq!(int_tag(sva, *b"CH"), 1);
    assert_eq!(string_tag(sva, *b"MH"), "SVA");

    let reference_names: Vec<String> =
        header.reference_sequences().keys().map(ToString::to_string).collect();
    assert_eq!(reference_names, vec!["chr1", "chr2"]);
    assert!(is_sorted(&header, UNSORTED));
    assert!(header.programs().as_ref().get(&b"mecluster"[..]).is_some());
}

#[test]
fn test_cluster_window_boundary() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("anchors.bam");
    let output = dir.path().join("clusters.bam");
    let header = create_header(&[("chr1", 100_000)], &[]);
    write_anchors(
        &input,
        &header,
        &[
            anchor("UUa", 0, 1_000, false, "ALU").build(),
            anchor("UUb", 0, 1_040, false, "ALU").build(),
            anchor("UUc", 0, 1_091, false, "ALU").build(),
        ],
    );

    run_cluster(&input, &output, &[]);

    let (header, records) = read_bam(&output);
    let sizes: Vec<i64> = records.iter().map(|r| int_tag(r, *b"CH")).collect();
    assert_eq!(sizes, vec![2, 1]);
    assert_eq!(reference_name(&header, &records[0]), "chr1");

    run_cluster(&input, &output, &["--search-radius", "60"]);
    let (_, records) = read_bam(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(int_tag(&records[0], *b"CH"), 3);
}

#[test]
fn test_cluster_filters_and_metrics() {
    let dir = TempDir::new().unwrap();
    let input = write_standard_input(dir.path());
    let output = dir.path().join("clusters.bam");
    let metrics_path = dir.path().join("clusters.metrics.txt");

    run_cluster(
        &input,
        &output,
        &["--min-reads", "2", "--metrics", metrics_path.to_str().unwrap()],
    );

    let (_, records) = read_bam(&output);
    let summary: Vec<(String, String)> = records
        .iter()
        .map(|r| (r.name().unwrap().to_string(), string_tag(r, *b"MH")))
        .collect();
    assert_eq!(
        summary,
        vec![("cluster1".to_string(), "ALU".to_string()), ("cluster2".to_string(), "L1".to_string())]
    );

    let metrics: Vec<ClusteringMetrics> = DelimFile::default().read_tsv(&metrics_path).unwrap();
    assert_eq!(metrics.len(), 1);
    let metrics = &metrics[0];
    assert_eq!(metrics.total_records, 7);
    assert_eq!(metrics.unmapped_records, 1);
    assert_eq!(metrics.clustered_records, 5);
    assert_eq!(metrics.total_clusters, 3);
    assert_eq!(metrics.emitted_clusters, 2);
    assert_eq!(metrics.filtered_min_reads, 1);
    assert_eq!(metrics.max_reads_per_cluster, 3);
    assert!((metrics.mean_reads_per_cluster - 2.5).abs() < 1e-9);
}

#[test]
fn test_cluster_multi_sample() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("anchors.bam");
    let output = dir.path().join("clusters.bam");
    let header = create_header(&[("1", 100_000)], &[("A", Some("S1")), ("B", Some("S2"))]);
    write_anchors(
        &input,
        &header,
        &[
            anchor("UUa", 0, 1_000, false, "L1").tag("RG", "A").build(),
            anchor("UUb", 0, 1_010, false, "L1").tag("RG", "B").build(),
            anchor("UUc", 0, 1_020, false, "L1").tag("RG", "A").build(),
            anchor("UUd", 0, 1_030, false, "L1").build(),
        ],
    );

    run_cluster(&input, &output, &["--sample-mode", "multi"]);

    let (header, records) = read_bam(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(string_tag(&records[0], *b"SC"), "NoRG=1, S1=2, S2=1");
    assert_eq!(header.read_groups().len(), 2);
}

#[test]
fn test_cluster_single_sample_uses_sample_tag() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("anchors.bam");
    let output = dir.path().join("clusters.bam");
    let header = create_header(&[("1", 100_000)], &[]);
    write_anchors(
        &input,
        &header,
        &[
            anchor("UUa", 0, 1_000, false, "ALU").tag("SN", "tumor").build(),
            anchor("UUb", 0, 1_010, false, "ALU").tag("SN", "tumor").build(),
            anchor("UXc", 0, 1_020, false, "ALU").tag("SN", "normal").build(),
        ],
    );

    run_cluster(&input, &output, &[]);

    let (_, records) = read_bam(&output);
    assert_eq!(string_tag(&records[0], *b"SC"), "normal=1, tumor=2");
}

#[test]
fn test_cluster_split_read_ignores_strand() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("anchors.bam");
    let output = dir.path().join("clusters.bam");
    let header = create_header(&[("1", 100_000)], &[]);
    write_anchors(
        &input,
        &header,
        &[
            anchor("UUa", 0, 1_000, false, "ALU").build(),
            anchor("UUb", 0, 1_010, true, "ALU").build(),
        ],
    );

    run_cluster(&input, &output, &[]);
    let (_, records) = read_bam(&output);
    assert_eq!(records.len(), 2);
    assert_eq!(string_tag(&records[0], *b"SP"), "false");

    run_cluster(&input, &output, &["--split-read"]);
    let (_, records) = read_bam(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(int_tag(&records[0], *b"CH"), 2);
    assert_eq!(string_tag(&records[0], *b"SP"), "true");
}

#[test]
fn test_cluster_keep_prefix_and_name_prefix() {
    let dir = TempDir::new().unwrap();
    let input = write_standard_input(dir.path());
    let output = dir.path().join("clusters.bam");

    run_cluster(&input, &output, &["--chromosome-prefix", "keep", "--name-prefix", "ins"]);

    let (header, records) = read_bam(&output);
    assert_eq!(records[0].name().unwrap().to_string(), "ins1");
    assert_eq!(reference_name(&header, &records[0]), "1");
    assert_eq!(reference_name(&header, &records[2]), "2");
}

#[test]
fn test_cluster_drops_undecodable_annotations() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("anchors.bam");
    let output = dir.path().join("clusters.bam");
    let header = create_header(&[("1", 100_000)], &[]);
    write_anchors(
        &input,
        &header,
        &[
            anchor("UUa", 0, 1_000, false, "ALU").build(),
            anchor("UUbad", 0, 1_010, false, ";").build(),
            anchor("UUb", 0, 1_020, false, "ALU").build(),
        ],
    );

    run_cluster(&input, &output, &[]);

    let (_, records) = read_bam(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(string_tag(&records[0], *b"RN"), "UUa,UUb");
}

#[test]
fn test_cluster_missing_input() {
    let dir = TempDir::new().unwrap();
    let output = dir.path().join("clusters.bam");
    let result = run_mecluster(&[
        "cluster",
        "-i",
        "/no/such/anchors.bam",
        "-o",
        output.to_str().unwrap(),
    ]);

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("Input BAM"));
}

#[test]
fn test_cluster_accepts_zero_search_radius() {
    let dir = TempDir::new().unwrap();
    let input = write_standard_input(dir.path());
    let output = dir.path().join("clusters.bam");

    run_cluster(&input, &output, &["--search-radius", "0"]);

    let (_, records) = read_bam(&output);
    let sizes: Vec<i64> = records.iter().map(|r| int_tag(r, *b"CH")).collect();
    assert_eq!(sizes, vec![1, 1, 1, 1, 1, 1]);
}

#[test]
fn test_cluster_interleaved_strands() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("anchors.bam");
    let output = dir.path().join("clusters.bam");
    let header = create_header(&[("1", 100_000)], &[]);
    write_anchors(
        &input,
        &header,
        &[
            anchor("UUa", 0, 1_000, false, "ALU").build(),
            anchor("UUb", 0, 1_005, true, "ALU").build(),
            anchor("UUc", 0, 1_010, false, "ALU").build(),
            anchor("UUd", 0, 1_015, true, "ALU").build(),
        ],
    );

    run_cluster(&input, &output, &[]);

    let (_, records) = read_bam(&output);
    let summary: Vec<(bool, String)> = records
        .iter()
        .map(|r| (r.flags().is_reverse_complemented(), string_tag(r, *b"RN")))
        .collect();
    assert_eq!(summary, vec![(false, "UUa,UUc".to_string()), (true, "UUb,UUd".to_string())]);
}

#[test]
fn test_cluster_untagged_read_past_window_does_not_split() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("anchors.bam");
    let output = dir.path().join("clusters.bam");
    let header = create_header(&[("1", 100_000)], &[]);
    write_anchors(
        &input,
        &header,
        &[
            anchor("UUa", 0, 1_000, false, "ALU").build(),
            anchor("UUx", 0, 1_055, false, ";").build(),
            anchor("UUb", 0, 1_048, false, "ALU").build(),
        ],
    );

    run_cluster(&input, &output, &[]);

    let (_, records) = read_bam(&output);
    assert_eq!(records.len(), 1);
    assert_eq!(string_tag(&records[0], *b"RN"), "UUa,UUb");
}
