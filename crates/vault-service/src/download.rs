//! Download flow — streams the latest version's content.

use tracing::debug;
use uuid::Uuid;

use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::storage::ByteStream;

use crate::service::VaultService;

/// Content stream plus the metadata a transport layer needs to serve it.
pub struct DownloadResult {
    /// The blob content.
    pub stream: ByteStream,
    /// Filename for a Content-Disposition header.
    pub original_filename: String,
    /// MIME type for a Content-Type header.
    pub content_type: String,
    /// Content size in bytes.
    pub size_bytes: i64,
}

impl std::fmt::Debug for DownloadResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadResult")
            .field("original_filename", &self.original_filename)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.size_bytes)
            .finish()
    }
}

impl VaultService {
    /// Downloads the file's latest version. Only a live latest record
    /// owned by the caller is downloadable.
    pub async fn download(&self, owner_id: &str, file_id: Uuid) -> AppResult<DownloadResult> {
        let record = self.require_live_latest(owner_id, file_id).await?;

        let stream = self
            .storage
            .fetch(&record.stored_path)
            .await
            .map_err(|e| match e.kind {
                // Live metadata pointing at a missing blob is an
                // integrity failure of the byte store, not an absent file.
                ErrorKind::NotFound => AppError::storage(format!(
                    "Stored content missing for file {file_id}"
                )),
                _ => e,
            })?;

        debug!(
            owner_id,
            file_id = %file_id,
            filename = %record.original_filename,
            "File downloaded"
        );

        Ok(DownloadResult {
            stream,
            original_filename: record.original_filename,
            content_type: record.content_type,
            size_bytes: record.size_bytes,
        })
    }
}
