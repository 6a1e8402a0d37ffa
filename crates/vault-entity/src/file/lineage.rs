//! Pure decisions over a fetched version lineage.
//!
//! These functions take the full, freshly fetched record list of one
//! `(owner_id, original_filename)` lineage and decide which record moves
//! where. They never touch persistence, so the promotion and demotion
//! rules are testable in isolation.

use uuid::Uuid;

use super::model::FileVersion;

/// Version number for the next upload given the current latest record.
pub fn next_version(latest: Option<&FileVersion>) -> i32 {
    latest.map(|record| record.version + 1).unwrap_or(1)
}

/// Record to promote after the version numbered `below_version` leaves
/// the lineage: the highest-version live record strictly below it.
/// `None` means the lineage has no live versions left.
pub fn promotion_candidate(lineage: &[FileVersion], below_version: i32) -> Option<&FileVersion> {
    lineage
        .iter()
        .filter(|record| record.is_live() && record.version < below_version)
        .max_by_key(|record| record.version)
}

/// Ids of live records wrongly carrying the latest marker when `keep` is
/// about to become (or stay) the single latest. Used by restore to
/// reconcile a lineage even if an earlier promotion left a stale marker.
pub fn stale_latest_ids(lineage: &[FileVersion], keep: Uuid) -> Vec<Uuid> {
    lineage
        .iter()
        .filter(|record| record.is_live() && record.is_latest && record.id != keep)
        .map(|record| record.id)
        .collect()
}
