//! Persistence contracts for version metadata and the owner ledger.
//!
//! Defined next to the entity models and implemented in `vault-store`
//! (PostgreSQL and in-memory). Every latest-pointer or delete-state
//! transition is a *conditional* write: the store checks the expected
//! prior state and fails with `StateConflict` if a concurrent writer got
//! there first, independent of any engine-side locking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use vault_core::result::AppResult;

use crate::file::FileVersion;
use crate::owner::Owner;

/// Persistence for [`FileVersion`] records and their lineage queries.
#[async_trait]
pub trait VersionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a freshly built record.
    async fn insert(&self, record: &FileVersion) -> AppResult<()>;

    /// Find a record by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileVersion>>;

    /// Find the live latest record of a lineage, if the lineage has one.
    async fn find_latest(
        &self,
        owner_id: &str,
        original_filename: &str,
    ) -> AppResult<Option<FileVersion>>;

    /// All records of a lineage, deleted ones included, newest version
    /// first.
    async fn find_lineage(
        &self,
        owner_id: &str,
        original_filename: &str,
    ) -> AppResult<Vec<FileVersion>>;

    /// All live records of an owner across every lineage, newest upload
    /// first.
    async fn find_live_by_owner(&self, owner_id: &str) -> AppResult<Vec<FileVersion>>;

    /// Clear the latest marker. Guard: the record is live and currently
    /// latest; otherwise fails `StateConflict`.
    async fn demote_latest(&self, id: Uuid) -> AppResult<()>;

    /// Set the latest marker. Guard: the record is live and currently not
    /// latest; otherwise fails `StateConflict`.
    async fn promote_latest(&self, id: Uuid) -> AppResult<()>;

    /// Soft-delete a record, clearing its latest marker. Guard: the
    /// record is live and currently latest; otherwise fails
    /// `StateConflict`.
    async fn mark_deleted(&self, id: Uuid, deleted_at: DateTime<Utc>) -> AppResult<()>;

    /// Bring a soft-deleted record back as latest. Guard: the record is
    /// currently deleted; otherwise fails `StateConflict`.
    async fn mark_restored(&self, id: Uuid) -> AppResult<()>;
}

/// Persistence for the per-owner quota ledger.
#[async_trait]
pub trait OwnerStore: Send + Sync + std::fmt::Debug + 'static {
    /// Fetch an owner's ledger record.
    async fn get(&self, owner_id: &str) -> AppResult<Option<Owner>>;

    /// Persist an owner's ledger record (upsert).
    async fn save(&self, owner: &Owner) -> AppResult<()>;
}
