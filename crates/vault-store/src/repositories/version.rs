//! PostgreSQL version store implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_entity::file::FileVersion;
use vault_entity::store::VersionStore;

/// Repository for [`FileVersion`] records.
///
/// Every state transition is a guarded UPDATE: the WHERE clause carries
/// the expected prior state, and zero affected rows means a concurrent
/// writer invalidated it.
#[derive(Debug, Clone)]
pub struct PgVersionStore {
    pool: PgPool,
}

impl PgVersionStore {
    /// Create a new version repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Map a guarded UPDATE result: exactly one row, or the expected
    /// state no longer held.
    fn require_transition(affected: u64, id: Uuid) -> AppResult<()> {
        if affected == 1 {
            Ok(())
        } else {
            Err(AppError::state_conflict(format!(
                "Version {id} was modified concurrently"
            )))
        }
    }
}

#[async_trait]
impl VersionStore for PgVersionStore {
    async fn insert(&self, record: &FileVersion) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO file_versions \
             (id, owner_id, original_filename, stored_path, content_type, size_bytes, \
              version, is_latest, deleted, deleted_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(record.id)
        .bind(&record.owner_id)
        .bind(&record.original_filename)
        .bind(&record.stored_path)
        .bind(&record.content_type)
        .bind(record.size_bytes)
        .bind(record.version)
        .bind(record.is_latest)
        .bind(record.deleted)
        .bind(record.deleted_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert version", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>("SELECT * FROM file_versions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find version", e))
    }

    async fn find_latest(
        &self,
        owner_id: &str,
        original_filename: &str,
    ) -> AppResult<Option<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions \
             WHERE owner_id = $1 AND original_filename = $2 \
               AND deleted = FALSE AND is_latest = TRUE",
        )
        .bind(owner_id)
        .bind(original_filename)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find latest version", e))
    }

    async fn find_lineage(
        &self,
        owner_id: &str,
        original_filename: &str,
    ) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions \
             WHERE owner_id = $1 AND original_filename = $2 \
             ORDER BY version DESC",
        )
        .bind(owner_id)
        .bind(original_filename)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load lineage", e))
    }

    async fn find_live_by_owner(&self, owner_id: &str) -> AppResult<Vec<FileVersion>> {
        sqlx::query_as::<_, FileVersion>(
            "SELECT * FROM file_versions \
             WHERE owner_id = $1 AND deleted = FALSE \
             ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list live versions", e))
    }

    async fn demote_latest(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE file_versions SET is_latest = FALSE \
             WHERE id = $1 AND is_latest = TRUE AND deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to demote version", e))?;

        Self::require_transition(result.rows_affected(), id)
    }

    async fn promote_latest(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE file_versions SET is_latest = TRUE \
             WHERE id = $1 AND is_latest = FALSE AND deleted = FALSE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to promote version", e))?;

        Self::require_transition(result.rows_affected(), id)
    }

    async fn mark_deleted(&self, id: Uuid, deleted_at: DateTime<Utc>) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE file_versions \
             SET deleted = TRUE, deleted_at = $2, is_latest = FALSE \
             WHERE id = $1 AND deleted = FALSE AND is_latest = TRUE",
        )
        .bind(id)
        .bind(deleted_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete version", e))?;

        Self::require_transition(result.rows_affected(), id)
    }

    async fn mark_restored(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE file_versions \
             SET deleted = FALSE, deleted_at = NULL, is_latest = TRUE \
             WHERE id = $1 AND deleted = TRUE",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to restore version", e))?;

        Self::require_transition(result.rows_affected(), id)
    }
}
