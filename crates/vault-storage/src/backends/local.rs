//! Local filesystem storage backend.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::debug;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::storage::{ByteStream, StorageBackend};

/// Local filesystem storage backend.
///
/// Every stored path is resolved beneath a single root directory; hints
/// that would escape the root are rejected before any filesystem call.
#[derive(Debug, Clone)]
pub struct LocalStorageBackend {
    /// Root directory for all stored blobs.
    root: PathBuf,
}

impl LocalStorageBackend {
    /// Create a new local backend rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a stored path to an absolute path contained in the root.
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        if path.trim().is_empty() {
            return Err(AppError::validation("Storage path is empty"));
        }

        let candidate = Path::new(path);
        if candidate.is_absolute() {
            return Err(AppError::validation(format!(
                "Storage path must be relative: {path}"
            )));
        }

        let mut resolved = self.root.clone();
        for component in candidate.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(AppError::validation(format!(
                        "Storage path escapes the storage root: {path}"
                    )));
                }
            }
        }
        Ok(resolved)
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for LocalStorageBackend {
    fn backend_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn store(&self, data: Bytes, path_hint: &str, _content_type: &str) -> AppResult<String> {
        let full_path = self.resolve(path_hint)?;
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {path_hint}"),
                e,
            )
        })?;

        debug!(path = path_hint, bytes = data.len(), "Stored blob");
        Ok(path_hint.to_string())
    }

    async fn fetch(&self, stored_path: &str) -> AppResult<ByteStream> {
        let full_path = self.resolve(stored_path)?;
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {stored_path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open blob: {stored_path}"),
                    e,
                )
            }
        })?;

        Ok(Box::pin(ReaderStream::new(file)))
    }

    async fn fetch_bytes(&self, stored_path: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(stored_path)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {stored_path}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob: {stored_path}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn exists(&self, stored_path: &str) -> AppResult<bool> {
        let full_path = self.resolve(stored_path)?;
        Ok(full_path.exists())
    }

    async fn remove(&self, stored_path: &str) -> AppResult<()> {
        let full_path = self.resolve(stored_path)?;
        if full_path.exists() {
            fs::remove_file(&full_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to remove blob: {stored_path}"),
                    e,
                )
            })?;
        }
        Ok(())
    }
}
