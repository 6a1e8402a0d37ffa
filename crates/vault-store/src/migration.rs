//! Database schema bootstrap.

use sqlx::PgPool;
use tracing::info;

use vault_core::error::{AppError, ErrorKind};

const DDL: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS owners (
        id TEXT PRIMARY KEY,
        credits INTEGER NOT NULL DEFAULT 0,
        used_bytes BIGINT NOT NULL DEFAULT 0,
        limit_bytes BIGINT NOT NULL DEFAULT 0,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS file_versions (
        id UUID PRIMARY KEY,
        owner_id TEXT NOT NULL,
        original_filename TEXT NOT NULL,
        stored_path TEXT NOT NULL,
        content_type TEXT NOT NULL,
        size_bytes BIGINT NOT NULL,
        version INTEGER NOT NULL,
        is_latest BOOLEAN NOT NULL,
        deleted BOOLEAN NOT NULL,
        deleted_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_file_versions_lineage
        ON file_versions (owner_id, original_filename, version DESC)",
    "CREATE INDEX IF NOT EXISTS idx_file_versions_owner_live
        ON file_versions (owner_id, created_at DESC) WHERE deleted = FALSE",
];

/// Create the vault tables and indexes if they do not exist. Idempotent.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!("Running database migrations...");

    for statement in DDL {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!("Failed to run migration: {e}"),
                e,
            )
        })?;
    }

    info!("Database migrations completed successfully");
    Ok(())
}
