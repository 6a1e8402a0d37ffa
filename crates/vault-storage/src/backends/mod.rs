//! Storage backend implementations.

pub mod local;
#[cfg(feature = "s3")]
pub mod s3;

pub use local::LocalStorageBackend;
#[cfg(feature = "s3")]
pub use s3::S3StorageBackend;

use std::sync::Arc;

use vault_core::config::storage::StorageConfig;
use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_core::traits::storage::StorageBackend;

/// Build the backend selected by `storage.backend`.
pub async fn backend_from_config(config: &StorageConfig) -> AppResult<Arc<dyn StorageBackend>> {
    match config.backend.as_str() {
        "local" => Ok(Arc::new(
            LocalStorageBackend::new(&config.local.root_path).await?,
        )),
        #[cfg(feature = "s3")]
        "s3" => Ok(Arc::new(S3StorageBackend::new(&config.s3).await?)),
        #[cfg(not(feature = "s3"))]
        "s3" => Err(AppError::configuration(
            "S3 backend requested but built without the `s3` feature",
        )),
        other => Err(AppError::configuration(format!(
            "Unknown storage backend: {other}"
        ))),
    }
}
