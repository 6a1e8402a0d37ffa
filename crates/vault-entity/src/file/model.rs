//! File version entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One uploaded version of a file.
///
/// Every upload creates a new record; re-uploading a filename extends the
/// lineage of that `(owner_id, original_filename)` pair instead of
/// replacing anything. Exactly one non-deleted record per lineage carries
/// `is_latest = true` as long as the lineage has a live version at all.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileVersion {
    /// Unique record identifier.
    pub id: Uuid,
    /// Authenticated identity of the owner. Opaque to this system.
    pub owner_id: String,
    /// The filename as uploaded by the owner.
    pub original_filename: String,
    /// Opaque handle into the storage backend. Never exposed to callers.
    #[serde(skip_serializing)]
    pub stored_path: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Content size in bytes. Always positive.
    pub size_bytes: i64,
    /// Position in the lineage, starting at 1. Never reused.
    pub version: i32,
    /// Whether this record is the lineage's current latest version.
    pub is_latest: bool,
    /// Soft-delete flag. Bytes and metadata are retained.
    pub deleted: bool,
    /// When the record was soft-deleted, if it is.
    pub deleted_at: Option<DateTime<Utc>>,
    /// When this version was uploaded.
    pub created_at: DateTime<Utc>,
}

impl FileVersion {
    /// Build the first or next version record of a lineage.
    pub fn new(
        owner_id: impl Into<String>,
        original_filename: impl Into<String>,
        stored_path: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: i64,
        version: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            original_filename: original_filename.into(),
            stored_path: stored_path.into(),
            content_type: content_type.into(),
            size_bytes,
            version,
            is_latest: true,
            deleted: false,
            deleted_at: None,
            created_at: Utc::now(),
        }
    }

    /// Whether this record is live (not soft-deleted).
    pub fn is_live(&self) -> bool {
        !self.deleted
    }
}
