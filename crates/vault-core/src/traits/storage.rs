//! Storage backend trait for pluggable byte-blob storage.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for reading blob contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for byte-blob storage backends.
///
/// A backend stores opaque blobs addressed by a stored path and knows
/// nothing about owners, versions, or quotas — that is all metadata-side
/// state. Implementations exist for the local filesystem and for
/// S3-compatible object stores. The trait is defined here in `vault-core`
/// and implemented in `vault-storage`.
///
/// The stored path returned by [`store`](StorageBackend::store) is an
/// opaque handle: callers persist it and hand it back verbatim to
/// [`fetch`](StorageBackend::fetch) and [`remove`](StorageBackend::remove).
/// It must never be exposed outside the application.
#[async_trait]
pub trait StorageBackend: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local", "s3").
    fn backend_type(&self) -> &str;

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store a blob under the given path hint and return the final stored
    /// path. The hint must already be collision-free; backends may use it
    /// as-is or derive their own key from it.
    async fn store(&self, data: Bytes, path_hint: &str, content_type: &str) -> AppResult<String>;

    /// Fetch a blob as a byte stream. Fails `NotFound` if the stored path
    /// does not exist, `Storage` for any other read failure.
    async fn fetch(&self, stored_path: &str) -> AppResult<ByteStream>;

    /// Fetch a blob fully into memory.
    async fn fetch_bytes(&self, stored_path: &str) -> AppResult<Bytes>;

    /// Whether a blob exists at the given stored path.
    async fn exists(&self, stored_path: &str) -> AppResult<bool>;

    /// Remove a blob. Best-effort: removing an absent path is not an
    /// error, and no caller in this system depends on removal happening.
    async fn remove(&self, stored_path: &str) -> AppResult<()>;
}
