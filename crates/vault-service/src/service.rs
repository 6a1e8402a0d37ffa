//! The vault service — upload, listing, download, soft-delete, restore,
//! version history, and credit-funded storage upgrades.

use std::sync::Arc;

use uuid::Uuid;

use vault_core::config::quota::QuotaConfig;
use vault_core::config::upload::UploadConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::storage::StorageBackend;
use vault_entity::file::FileVersion;
use vault_entity::owner::Owner;
use vault_entity::store::{OwnerStore, VersionStore};

use crate::locks::LineageLocks;

/// Orchestrates the version store, owner ledger, and storage backend.
///
/// The service holds no mutable state of its own — every operation
/// fetches what it needs, so one instance is safely shared across
/// parallel callers. The caller supplies an authenticated owner identity
/// with every call; no authentication happens here.
#[derive(Clone)]
pub struct VaultService {
    /// Version metadata store.
    pub(crate) versions: Arc<dyn VersionStore>,
    /// Owner quota ledger store.
    pub(crate) owners: Arc<dyn OwnerStore>,
    /// Byte-blob backend.
    pub(crate) storage: Arc<dyn StorageBackend>,
    /// Upload acceptance limits.
    pub(crate) upload_config: UploadConfig,
    /// Credit-to-storage exchange settings.
    pub(crate) quota_config: QuotaConfig,
    /// Per-lineage serialization gates.
    pub(crate) locks: Arc<LineageLocks>,
}

impl std::fmt::Debug for VaultService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultService").finish()
    }
}

impl VaultService {
    /// Creates a new vault service.
    pub fn new(
        versions: Arc<dyn VersionStore>,
        owners: Arc<dyn OwnerStore>,
        storage: Arc<dyn StorageBackend>,
        upload_config: UploadConfig,
        quota_config: QuotaConfig,
    ) -> Self {
        Self {
            versions,
            owners,
            storage,
            upload_config,
            quota_config,
            locks: Arc::new(LineageLocks::new()),
        }
    }

    /// Lists every live record of the owner, newest upload first.
    ///
    /// Superseded versions that were never deleted are included: the
    /// listing is a flat feed of live records, one row per version, not
    /// one row per filename.
    pub async fn list_files(&self, owner_id: &str) -> AppResult<Vec<FileVersion>> {
        self.versions.find_live_by_owner(owner_id).await
    }

    /// Returns the full lineage of the file identified by `file_id`,
    /// newest version first, deleted records included.
    ///
    /// The id may name any record of the lineage, deleted or not, as
    /// long as it belongs to the caller.
    pub async fn get_versions(&self, owner_id: &str, file_id: Uuid) -> AppResult<Vec<FileVersion>> {
        let base = self
            .versions
            .find_by_id(file_id)
            .await?
            .filter(|record| record.owner_id == owner_id)
            .ok_or_else(|| AppError::not_found("File not found"))?;

        self.versions
            .find_lineage(owner_id, &base.original_filename)
            .await
    }

    /// Fetches the owner's quota ledger record.
    pub async fn get_owner(&self, owner_id: &str) -> AppResult<Owner> {
        self.require_owner(owner_id).await
    }

    /// Loads an owner or fails `NotFound`.
    pub(crate) async fn require_owner(&self, owner_id: &str) -> AppResult<Owner> {
        self.owners
            .get(owner_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Owner {owner_id} not found")))
    }

    /// Loads the record only if it is the caller's live latest version.
    pub(crate) async fn require_live_latest(
        &self,
        owner_id: &str,
        file_id: Uuid,
    ) -> AppResult<FileVersion> {
        self.versions
            .find_by_id(file_id)
            .await?
            .filter(|record| record.owner_id == owner_id && !record.deleted && record.is_latest)
            .ok_or_else(|| AppError::not_found("File not found"))
    }
}
