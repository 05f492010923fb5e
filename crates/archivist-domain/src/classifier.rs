//! Age classification
//!
//! Pure predicates deciding whether a file is old enough to archive and
//! whether a pass produced anything worth reporting.

use crate::ArchiveThreshold;

/// Whether a file last modified at `last_modified` is older than `threshold` at `now`
///
/// Both timestamps are milliseconds since the Unix epoch. The comparison is
/// strict: an age exactly equal to the threshold is not old. A file modified
/// "in the future" (clock skew) is never old.
///
/// # Examples
///
/// ```
/// use archivist_domain::{is_old, ArchiveThreshold};
///
/// let limit = ArchiveThreshold::from_millis(5_000);
/// assert!(is_old(10_000, 1_000, limit));
/// assert!(!is_old(10_000, 8_000, limit));
/// assert!(!is_old(10_000, 5_000, limit));
/// ```
pub fn is_old(now: i64, last_modified: i64, threshold: ArchiveThreshold) -> bool {
    // i128 keeps the subtraction exact for any pair of i64 inputs
    let age = i128::from(now) - i128::from(last_modified);
    age > i128::from(threshold.as_millis())
}

/// Whether `eligible_count` files justify a notification or summary
pub fn should_archive(eligible_count: usize) -> bool {
    eligible_count > 0
}
