//! In-memory store implementations.
//!
//! Same contract as the PostgreSQL repositories, backed by
//! `RwLock<HashMap>`. Conditional transitions perform their
//! expected-state check under the write guard, so the conflict semantics
//! match the guarded UPDATEs of the database implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_entity::file::FileVersion;
use vault_entity::owner::Owner;
use vault_entity::store::{OwnerStore, VersionStore};

/// In-memory [`VersionStore`].
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    records: RwLock<HashMap<Uuid, FileVersion>>,
}

impl MemoryVersionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn insert(&self, record: &FileVersion) -> AppResult<()> {
        let mut records = self.records.write().await;
        records.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileVersion>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn find_latest(
        &self,
        owner_id: &str,
        original_filename: &str,
    ) -> AppResult<Option<FileVersion>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .find(|r| {
                r.owner_id == owner_id
                    && r.original_filename == original_filename
                    && !r.deleted
                    && r.is_latest
            })
            .cloned())
    }

    async fn find_lineage(
        &self,
        owner_id: &str,
        original_filename: &str,
    ) -> AppResult<Vec<FileVersion>> {
        let records = self.records.read().await;
        let mut lineage: Vec<FileVersion> = records
            .values()
            .filter(|r| r.owner_id == owner_id && r.original_filename == original_filename)
            .cloned()
            .collect();
        lineage.sort_by(|a, b| b.version.cmp(&a.version));
        Ok(lineage)
    }

    async fn find_live_by_owner(&self, owner_id: &str) -> AppResult<Vec<FileVersion>> {
        let records = self.records.read().await;
        let mut live: Vec<FileVersion> = records
            .values()
            .filter(|r| r.owner_id == owner_id && !r.deleted)
            .cloned()
            .collect();
        live.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(live)
    }

    async fn demote_latest(&self, id: Uuid) -> AppResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Version {id} not found")))?;
        if record.deleted || !record.is_latest {
            return Err(AppError::state_conflict(format!(
                "Version {id} is no longer the live latest"
            )));
        }
        record.is_latest = false;
        Ok(())
    }

    async fn promote_latest(&self, id: Uuid) -> AppResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Version {id} not found")))?;
        if record.deleted || record.is_latest {
            return Err(AppError::state_conflict(format!(
                "Version {id} cannot be promoted"
            )));
        }
        record.is_latest = true;
        Ok(())
    }

    async fn mark_deleted(&self, id: Uuid, deleted_at: DateTime<Utc>) -> AppResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Version {id} not found")))?;
        if record.deleted || !record.is_latest {
            return Err(AppError::state_conflict(format!(
                "Version {id} is no longer the live latest"
            )));
        }
        record.deleted = true;
        record.deleted_at = Some(deleted_at);
        record.is_latest = false;
        Ok(())
    }

    async fn mark_restored(&self, id: Uuid) -> AppResult<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Version {id} not found")))?;
        if !record.deleted {
            return Err(AppError::state_conflict(format!(
                "Version {id} is not deleted"
            )));
        }
        record.deleted = false;
        record.deleted_at = None;
        record.is_latest = true;
        Ok(())
    }
}

/// In-memory [`OwnerStore`].
#[derive(Debug, Default)]
pub struct MemoryOwnerStore {
    owners: RwLock<HashMap<String, Owner>>,
}

impl MemoryOwnerStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OwnerStore for MemoryOwnerStore {
    async fn get(&self, owner_id: &str) -> AppResult<Option<Owner>> {
        let owners = self.owners.read().await;
        Ok(owners.get(owner_id).cloned())
    }

    async fn save(&self, owner: &Owner) -> AppResult<()> {
        let mut owners = self.owners.write().await;
        owners.insert(owner.id.clone(), owner.clone());
        Ok(())
    }
}
