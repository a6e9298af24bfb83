//! Report the read names of a BAM with their alignment and mate positions.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use mecluster_lib::bam_io::create_bam_reader;
use mecluster_lib::cluster::ChromosomePrefix;
use mecluster_lib::logging::OperationTimer;
use mecluster_lib::progress::ProgressTracker;
use mecluster_lib::read_names::{ReadNameOptions, ReadNameRow, write_read_names};
use mecluster_lib::validation::validate_file_exists;
use std::path::PathBuf;

use crate::commands::command::Command;
use crate::commands::common::ThreadingOptions;

/// Write a TSV of read names with their alignment and mate positions.
#[derive(Debug, Parser)]
#[command(
    name = "read-names",
    about = "\x1b[38;5;173m[UTILITIES]\x1b[0m      \x1b[36mReport read names with alignment and mate positions\x1b[0m",
    long_about = r#"
Write a TSV with one row per record of a BAM:

  read_name  reference  start  end  mate_reference  mate_start

Positions are 1-based; missing positions are left empty and missing references are written
as '*'. Use --prefix-length 2 to drop the mapping-category prefix (UU/UM/UX) from anchor read
names.

Example usage:
  mecluster read-names -i anchors.bam -o anchors.read_names.txt --prefix-length 2
  mecluster read-names -i anchors.bam -o anchors.read_names.txt --auto-prefix-reference
"#
)]
pub struct ReadNames {
    /// Input BAM file
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output TSV file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,

    /// Threading options
    #[command(flatten)]
    pub threading: ThreadingOptions,

    /// Number of leading characters to remove from each read name
    #[arg(short = 'p', long = "prefix-length", default_value_t = 0)]
    pub prefix_length: usize,

    /// Prefix to add to reference names that do not already carry it
    #[arg(long = "reference-prefix", conflicts_with = "auto_prefix_reference")]
    pub reference_prefix: Option<String>,

    /// Add 'chr' to reference names that do not already carry it
    #[arg(long = "auto-prefix-reference", default_value = "false")]
    pub auto_prefix_reference: bool,
}

impl ReadNames {
    fn options(&self) -> ReadNameOptions {
        let reference_prefix = match (&self.reference_prefix, self.auto_prefix_reference) {
            (Some(prefix), _) => ChromosomePrefix::Custom(prefix.clone()),
            (None, true) => ChromosomePrefix::Auto,
            (None, false) => ChromosomePrefix::Keep,
        };
        ReadNameOptions { prefix_length: self.prefix_length, reference_prefix }
    }
}

impl Command for ReadNames {
    fn execute(&self, _command_line: &str) -> Result<()> {
        validate_file_exists(&self.input, "Input BAM")?;
        self.threading.validate()?;

        let timer = OperationTimer::new("Collecting read names");
        info!("Input: {}", self.input.display());
        info!("Output: {}", self.output.display());

        let options = self.options();
        let (mut reader, header) = create_bam_reader(&self.input, self.threading.threads)?;
        let mut progress = ProgressTracker::new("Processed records");

        let mut rows = Vec::new();
        for result in reader.record_bufs(&header) {
            let record = result
                .with_context(|| format!("Failed to read record from {}", self.input.display()))?;
            let row = ReadNameRow::from_record_buf(&record, &header, &options);
            progress.record(None);
            rows.push(row);
        }
        progress.log_final();

        write_read_names(&self.output, &rows)?;
        timer.log_completion(rows.len() as u64);
        Ok(())
    }
}
