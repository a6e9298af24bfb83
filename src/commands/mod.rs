//! CLI command implementations for mecluster.
//!
//! - [`cluster`] - Cluster anchor reads into consensus insertion records
//! - [`read_names`] - Report read names with alignment and mate positions

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate, clippy::struct_excessive_bools)]

pub mod cluster;
pub mod command;
pub mod common;
pub mod read_names;
