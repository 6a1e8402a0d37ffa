//! PostgreSQL owner ledger store implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_entity::owner::Owner;
use vault_entity::store::OwnerStore;

/// Repository for [`Owner`] ledger records.
#[derive(Debug, Clone)]
pub struct PgOwnerStore {
    pool: PgPool,
}

impl PgOwnerStore {
    /// Create a new owner repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OwnerStore for PgOwnerStore {
    async fn get(&self, owner_id: &str) -> AppResult<Option<Owner>> {
        sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE id = $1")
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find owner", e))
    }

    async fn save(&self, owner: &Owner) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO owners (id, credits, used_bytes, limit_bytes, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET \
               credits = EXCLUDED.credits, \
               used_bytes = EXCLUDED.used_bytes, \
               limit_bytes = EXCLUDED.limit_bytes, \
               updated_at = EXCLUDED.updated_at",
        )
        .bind(&owner.id)
        .bind(owner.credits)
        .bind(owner.used_bytes)
        .bind(owner.limit_bytes)
        .bind(owner.created_at)
        .bind(owner.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to save owner", e))?;
        Ok(())
    }
}
