//! SAM/BAM header utilities and test record builders.
//!
//! - [`is_sorted`] / [`check_coordinate_sort`] - validate the sort order declared in a header
//! - [`builder`] - builders for records and headers used by tests

pub mod builder;

pub use builder::{RecordBuilder, create_header, parse_cigar, write_bam};

use log::warn;
use noodles::sam::Header;
use noodles::sam::header::record::value::map::header::sort_order::COORDINATE;
use std::path::Path;

/// Checks if a header declares the given sort order in its `@HD SO` field.
///
/// # Examples
///
/// ```rust,ignore
/// use noodles::sam::header::record::value::map::header::sort_order::COORDINATE;
///
/// if is_sorted(&header, COORDINATE) {
///     // stream anchors straight into clusters
/// }
/// ```
#[must_use]
pub fn is_sorted(header: &Header, sort_order: &[u8]) -> bool {
    header.header().is_some_and(|hdr_map| {
        hdr_map
            .other_fields()
            .get(b"SO")
            .is_some_and(|so| <_ as AsRef<[u8]>>::as_ref(so) == sort_order)
    })
}

/// Logs a warning if an input is not coordinate sorted per its header.
///
/// Clustering still proceeds; unsorted input fragments clusters rather than failing.
pub fn check_coordinate_sort(header: &Header, path: &Path) {
    if !is_sorted(header, COORDINATE) {
        warn!(
            "Input file {} does not appear to be coordinate sorted per the SAM header.",
            path.display()
        );
        warn!("Continuing, but clusters may be split or incomplete.");
    }
}
