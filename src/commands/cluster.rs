//! Cluster mobile-element anchor reads into one consensus record per insertion signal.
//!
//! Reads a coordinate-sorted BAM of anchor reads, each carrying the mobile-element annotation
//! of its mate, and writes a BAM with one synthetic record per cluster.

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use mecluster_lib::bam_io::{BamWriter, create_bam_reader, create_bam_writer, finish_bam_writer, write_record};
use mecluster_lib::cluster::{ChromosomePrefix, ClusterConfig};
use mecluster_lib::clusterer::{
    AnchorClusterer, ClustererOptions, DEFAULT_NAME_PREFIX, DEFAULT_SEARCH_RADIUS, NamedConsensus,
};
use mecluster_lib::logging::{OperationTimer, log_clustering_summary};
use mecluster_lib::metrics::writer::write_metrics_auto;
use mecluster_lib::output::build_output_header;
use mecluster_lib::progress::ProgressTracker;
use mecluster_lib::record::AlignmentRecord;
use mecluster_lib::sam::check_coordinate_sort;
use mecluster_lib::sample::{SampleLookup, SampleMode};
use mecluster_lib::validation::{validate_percentage, validate_positive};
use noodles::sam::Header;
use std::path::PathBuf;

use crate::commands::command::Command;
use crate::commands::common::{BamIoOptions, ThreadingOptions};
use crate::version::VERSION;

/// Cluster anchor reads into consensus insertion records.
#[derive(Debug, Parser)]
#[command(
    name = "cluster",
    about = "\x1b[38;5;72m[CLUSTERING]\x1b[0m     \x1b[36mCluster anchor reads into consensus insertion records\x1b[0m",
    long_about = r#"
Cluster mobile-element anchor reads into one consensus record per insertion signal.

Anchor reads are uniquely mapped reads whose mate was annotated with the mobile-element
categories it aligned to (ME:Z tag, e.g. "ALU,L1;AluY"). Read names carry a mapping-category
prefix: UU (mate unique), UM (mate multi-mapped) or UX (mate unmapped).

Anchors are streamed in coordinate order. One cluster is kept open per first-listed
mobile-element category and strand (category only with --split-read), so anchors of both strands
at one insertion are clustered side by side. A read joins the open cluster of its category and
strand when it is on the same reference and starts no more than --search-radius bases after, and
no more than 10 bases before, that cluster's last read. Otherwise that cluster is closed and a
new one started. Clusters the stream has moved past are closed as well.

Each closed cluster passing the filters is written as a single record spanning the cluster, with
mapping quality set to the median of its members and these tags:
  CH:i reads   CL:i length   MH:Z category   SP:Z split-read   RN:Z read names
  UU:i/UM:i/UX:i reads per mapping category   SC:Z reads per sample

Example usage:
  mecluster cluster -i anchors.bam -o clusters.bam
  mecluster cluster -i anchors.bam -o clusters.bam --sample-mode multi --min-reads 3
  mecluster cluster -i split.bam -o split_clusters.bam --split-read --metrics clusters.metrics.txt
"#
)]
pub struct Cluster {
    /// Input/output BAM options
    #[command(flatten)]
    pub io: BamIoOptions,

    /// Threading options
    #[command(flatten)]
    pub threading: ThreadingOptions,

    /// Maximum distance from the last read's start for a read to join a cluster
    #[arg(short = 'r', long = "search-radius", default_value_t = DEFAULT_SEARCH_RADIUS)]
    pub search_radius: usize,

    /// Build clusters from split reads, accepting reads on either strand
    #[arg(long = "split-read", default_value = "false")]
    pub split_read: bool,

    /// Input is position sorted, so each cluster starts at its first read
    #[arg(long = "assume-sorted", default_value = "true", action = clap::ArgAction::Set)]
    pub assume_sorted: bool,

    /// Take the sample of each read from its sample-name tag (single) or read group (multi)
    #[arg(long = "sample-mode", default_value_t = SampleMode::Single)]
    pub sample_mode: SampleMode,

    /// Reference name prefix on output: 'auto' adds 'chr', 'keep' leaves names, anything else is
    /// added as given
    #[arg(long = "chromosome-prefix", default_value_t = ChromosomePrefix::Auto)]
    pub chromosome_prefix: ChromosomePrefix,

    /// Minimum number of reads for a cluster to be written
    #[arg(short = 'm', long = "min-reads", default_value_t = 1)]
    pub min_reads: usize,

    /// Drop clusters whose mates map to more than this many chromosomes
    #[arg(long = "max-mate-chromosomes")]
    pub max_mate_chromosomes: Option<usize>,

    /// Drop clusters with a lower percentage of mates on their most common chromosome
    #[arg(long = "min-same-chromosome-pct")]
    pub min_same_chromosome_pct: Option<f64>,

    /// Leave unmapped mates out of the mate chromosome filters
    #[arg(long = "skip-unmapped-mates", default_value = "false")]
    pub skip_unmapped_mates: bool,

    /// Prefix of consensus record names, followed by the cluster number
    #[arg(long = "name-prefix", default_value = DEFAULT_NAME_PREFIX)]
    pub name_prefix: String,

    /// Optional output file for clustering metrics
    #[arg(long = "metrics")]
    pub metrics: Option<PathBuf>,
}

impl Cluster {
    fn validate(&self) -> Result<()> {
        self.io.validate()?;
        self.threading.validate()?;
        validate_positive(self.min_reads, "min-reads")?;
        if let Some(max) = self.max_mate_chromosomes {
            validate_positive(max, "max-mate-chromosomes")?;
        }
        if let Some(pct) = self.min_same_chromosome_pct {
            validate_percentage(pct, "min-same-chromosome-pct")?;
        }
        Ok(())
    }

    fn cluster_config(&self) -> ClusterConfig {
        ClusterConfig {
            split_read: self.split_read,
            assume_sorted: self.assume_sorted,
            sample_mode: self.sample_mode,
            chromosome_prefix: self.chromosome_prefix.clone(),
        }
    }

    fn clusterer_options(&self) -> ClustererOptions {
        ClustererOptions {
            search_radius: self.search_radius,
            min_reads: self.min_reads,
            max_mate_chromosomes: self.max_mate_chromosomes,
            min_same_chromosome_pct: self.min_same_chromosome_pct,
            skip_unmapped_mates: self.skip_unmapped_mates,
            name_prefix: self.name_prefix.clone(),
        }
    }
}

impl Command for Cluster {
    fn execute(&self, command_line: &str) -> Result<()> {
        self.validate()?;

        let timer = OperationTimer::new("Clustering anchors");

        info!("Input: {}", self.io.input.display());
        info!("Output: {}", self.io.output.display());
        info!("Search radius: {}", self.search_radius);
        info!("Sample mode: {}", self.sample_mode);
        info!("Chromosome prefix: {}", self.chromosome_prefix);
        if self.split_read {
            info!("Split-read clustering: enabled");
        }
        if !self.assume_sorted {
            info!("Cluster starts taken from the leftmost read");
        }

        let (mut reader, header) = create_bam_reader(&self.io.input, self.threading.threads)?;
        check_coordinate_sort(&header, &self.io.input);

        let samples = SampleLookup::from_header(&header);
        if self.sample_mode == SampleMode::Multi && samples.is_empty() {
            info!("No read groups with a sample name; all reads will count as unattributed");
        }

        let config = self.cluster_config();
        let output_header =
            build_output_header(&header, &config.chromosome_prefix, VERSION, command_line)?;
        let mut writer =
            create_bam_writer(&self.io.output, &output_header, self.threading.threads)?;

        let mut clusterer = AnchorClusterer::new(config, self.clusterer_options());
        let mut progress = ProgressTracker::new("Processed anchors");

        for result in reader.record_bufs(&header) {
            let record = result.with_context(|| {
                format!("Failed to read record from {}", self.io.input.display())
            })?;

            if record.flags().is_unmapped() {
                clusterer.skip_unmapped();
                progress.record(None);
                continue;
            }

            let anchor = match AlignmentRecord::from_record_buf(&record, &header, &samples) {
                Ok(anchor) => anchor,
                Err(e) => {
                    debug!("Skipping record: {e}");
                    clusterer.skip_unmapped();
                    progress.record(None);
                    continue;
                }
            };
            progress.record(Some((anchor.reference_name.as_str(), anchor.start)));

            for named in clusterer.add(anchor) {
                write_consensus(&mut writer, &output_header, &named)?;
            }
        }

        for named in clusterer.finish() {
            write_consensus(&mut writer, &output_header, &named)?;
        }
        progress.log_final();
        finish_bam_writer(writer)?;

        let metrics = clusterer.into_metrics();
        if let Some(path) = &self.metrics {
            write_metrics_auto(path, std::slice::from_ref(&metrics))?;
            info!("Wrote metrics to {}", path.display());
        }
        log_clustering_summary(&metrics);
        timer.log_completion(metrics.total_records);
        Ok(())
    }
}

fn write_consensus(writer: &mut BamWriter, header: &Header, named: &NamedConsensus) -> Result<()> {
    let record = named.consensus.to_record_buf(&named.name, header)?;
    write_record(writer, header, &record)
}
