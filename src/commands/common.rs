//! Common CLI options shared across commands.
//!
//! Shared argument structures are composed into command structs using `#[command(flatten)]`.

use std::path::PathBuf;

use clap::Args;

use mecluster_lib::validation::{validate_file_exists, validate_positive};

/// Input/output options for commands that read a BAM and write a BAM.
#[derive(Debug, Clone, Args)]
pub struct BamIoOptions {
    /// Input BAM file
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,

    /// Output BAM file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
}

impl BamIoOptions {
    /// Validates that the input file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the input file does not exist.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_file_exists(&self.input, "Input BAM")?;
        Ok(())
    }
}

/// Options for BGZF threading.
///
/// ```bash
/// mecluster cluster --threads 4 ...
/// # Decompresses the input and compresses the output on 4 worker threads each
/// ```
#[derive(Debug, Clone, Args)]
pub struct ThreadingOptions {
    /// Number of BGZF (de)compression threads (1 = single-threaded).
    #[arg(short = 't', long = "threads", default_value_t = 1)]
    pub threads: usize,
}

impl Default for ThreadingOptions {
    fn default() -> Self {
        Self { threads: 1 }
    }
}

impl ThreadingOptions {
    /// Validates that at least one thread is requested.
    ///
    /// # Errors
    ///
    /// Returns an error if `threads` is zero.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_positive(self.threads, "threads")?;
        Ok(())
    }
}
