//! Soft-delete and restore — latest-pointer movement over a lineage.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_entity::file::{FileVersion, lineage};

use crate::service::VaultService;

impl VaultService {
    /// Soft-deletes the file's latest version and promotes the highest
    /// remaining live version of the lineage, if any.
    ///
    /// Only the live latest record is directly deletable; naming any
    /// other record fails `NotFound`. The blob stays in the backend.
    pub async fn soft_delete(&self, owner_id: &str, file_id: Uuid) -> AppResult<()> {
        let record = self.require_live_latest(owner_id, file_id).await?;

        let gate = self.locks.lock_for(owner_id, &record.original_filename);
        let _guard = gate.lock().await;

        self.versions.mark_deleted(record.id, Utc::now()).await?;

        let mut owner = self.require_owner(owner_id).await?;
        owner.remove_used(record.size_bytes);
        self.owners.save(&owner).await?;

        let chain = self
            .versions
            .find_lineage(owner_id, &record.original_filename)
            .await?;
        if let Some(candidate) = lineage::promotion_candidate(&chain, record.version) {
            self.versions.promote_latest(candidate.id).await?;
            info!(
                owner_id,
                filename = %record.original_filename,
                deleted_version = record.version,
                promoted_version = candidate.version,
                "File version deleted, previous version promoted"
            );
        } else {
            info!(
                owner_id,
                filename = %record.original_filename,
                deleted_version = record.version,
                "File version deleted, lineage has no live versions left"
            );
        }

        Ok(())
    }

    /// Restores a soft-deleted version as the lineage's latest,
    /// re-counting its bytes against the owner's quota.
    ///
    /// Every other live record of the lineage is demoted, so the lineage
    /// ends up with exactly one latest even if an earlier promotion left
    /// a stale marker behind.
    pub async fn restore(&self, owner_id: &str, file_id: Uuid) -> AppResult<FileVersion> {
        let record = self
            .versions
            .find_by_id(file_id)
            .await?
            .filter(|r| r.owner_id == owner_id && r.deleted)
            .ok_or_else(|| AppError::not_found("File not found"))?;

        let gate = self.locks.lock_for(owner_id, &record.original_filename);
        let _guard = gate.lock().await;

        self.versions.mark_restored(record.id).await?;

        let chain = self
            .versions
            .find_lineage(owner_id, &record.original_filename)
            .await?;
        for stale_id in lineage::stale_latest_ids(&chain, record.id) {
            self.versions.demote_latest(stale_id).await?;
        }

        let mut owner = self.require_owner(owner_id).await?;
        owner.add_used(record.size_bytes);
        self.owners.save(&owner).await?;

        let restored = self
            .versions
            .find_by_id(record.id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        info!(
            owner_id,
            filename = %restored.original_filename,
            version = restored.version,
            "File version restored"
        );

        Ok(restored)
    }
}
