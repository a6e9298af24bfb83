//! Membership rules deciding whether a read may join a cluster.
//!
//! Only the best-ranked (first-listed) mobile-element category is compared. A read whose
//! best hit is one category and whose second hit matches another cluster's category is
//! never merged into that cluster.

use crate::errors::Result;
use crate::mobile_tag::MobileTag;
use crate::record::AlignmentRecord;

/// Checks whether `candidate` may join a cluster whose first member is `first`.
///
/// With `split_read` the strands may differ; reference and first-listed category must
/// always match.
///
/// # Errors
/// Returns [`crate::errors::MeClusterError::CategoryDecode`] if either record's mobile
/// annotation cannot be decoded.
pub fn is_valid_addition(
    first: &AlignmentRecord,
    candidate: &AlignmentRecord,
    split_read: bool,
) -> Result<bool> {
    let first_tag = MobileTag::from_record(first)?;
    let candidate_tag = MobileTag::from_record(candidate)?;

    Ok(is_compatible(
        first,
        first_tag.first_category(),
        candidate,
        candidate_tag.first_category(),
        split_read,
    ))
}

/// Same rule as [`is_valid_addition`] over already decoded categories.
pub(crate) fn is_compatible(
    first: &AlignmentRecord,
    first_category: &str,
    candidate: &AlignmentRecord,
    candidate_category: &str,
    split_read: bool,
) -> bool {
    let same_reference = first.reference_name == candidate.reference_name;
    let same_category = first_category == candidate_category;
    let same_strand = first.strand == candidate.strand;

    same_reference && same_category && (split_read || same_strand)
}

/// Whether both reads have their mates on the same reference sequence.
#[must_use]
pub fn is_mate_same_reference(a: &AlignmentRecord, b: &AlignmentRecord) -> bool {
    a.mate_reference_name == b.mate_reference_name
}

/// Whether both mates are on the same reference and `b`'s mate starts within `region` of
/// `a`'s mate.
#[must_use]
pub fn is_mate_same_reference_within_region(
    a: &AlignmentRecord,
    b: &AlignmentRecord,
    region: usize,
) -> bool {
    if !is_mate_same_reference(a, b) {
        return false;
    }
    match (a.mate_start, b.mate_start) {
        (Some(a_start), Some(b_start)) => a_start.abs_diff(b_start) <= region,
        _ => false,
    }
}
