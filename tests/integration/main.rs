//! Integration tests for the mecluster binary.
//!
//! These tests write small anchor BAMs, run the compiled binary on them and check the
//! records, headers and reports it produces.

mod helpers;
mod test_cluster_command;
mod test_read_names_command;
