//! Positional gate applied before membership rules.

use crate::record::AlignmentRecord;

/// How far (in bases) a candidate may start before the last member and still be considered.
///
/// Absorbs small sort jitter in otherwise position-sorted input.
pub const WIGGLE: usize = 10;

/// Whether `candidate` lies in the search area that follows `last`.
///
/// Requires the same reference and `last.start - WIGGLE <= candidate.start <= last.start +
/// search_radius`.
#[must_use]
pub fn is_within_window(last: &AlignmentRecord, candidate: &AlignmentRecord, search_radius: usize) -> bool {
    last.reference_name == candidate.reference_name
        && candidate.start + WIGGLE >= last.start
        && candidate.start <= last.start.saturating_add(search_radius)
}
