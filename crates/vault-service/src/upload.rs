//! Upload flow — validation, quota check, byte write, version chaining.

use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_entity::file::{FileVersion, lineage};

use crate::service::VaultService;

/// Parameters for a single upload.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    /// Filename as supplied by the owner.
    pub original_filename: String,
    /// MIME type of the content.
    pub content_type: String,
    /// Full content bytes.
    pub data: Bytes,
}

impl VaultService {
    /// Uploads a file, creating version 1 of a new lineage or extending
    /// the existing lineage of `(owner, filename)`.
    ///
    /// Bytes land in the storage backend before any metadata or ledger
    /// write. If a metadata step fails afterwards, the stored blob is
    /// orphaned: nothing references it and nothing collects it. Rejected
    /// uploads (validation, size, quota) mutate no state at all.
    pub async fn upload(&self, owner_id: &str, request: UploadRequest) -> AppResult<FileVersion> {
        let size_bytes = request.data.len() as i64;
        if size_bytes <= 0 {
            return Err(AppError::validation("File is empty"));
        }
        if request.original_filename.trim().is_empty() {
            return Err(AppError::validation("Filename is empty"));
        }
        if size_bytes > self.upload_config.max_size_bytes {
            return Err(AppError::file_too_large(format!(
                "File is {size_bytes} bytes, maximum is {} bytes",
                self.upload_config.max_size_bytes
            )));
        }
        if !self.upload_config.accepts_content_type(&request.content_type) {
            return Err(AppError::validation(format!(
                "Content type not allowed: {}",
                request.content_type
            )));
        }

        let owner = self.require_owner(owner_id).await?;
        if owner.would_exceed(size_bytes) {
            return Err(AppError::quota_exceeded(format!(
                "Storage limit exceeded. Used: {}, file: {size_bytes}, limit: {}",
                owner.used_bytes, owner.limit_bytes
            )));
        }

        // The hint is never derived solely from caller input: the random
        // token keeps concurrent uploads of one filename collision-free.
        let path_hint = format!(
            "{}/{}_{}",
            path_safe(owner_id, "owner"),
            Uuid::new_v4(),
            path_safe(&request.original_filename, "file")
        );
        let stored_path = self
            .storage
            .store(request.data.clone(), &path_hint, &request.content_type)
            .await?;

        let gate = self.locks.lock_for(owner_id, &request.original_filename);
        let _guard = gate.lock().await;

        match self
            .commit_upload(owner_id, &request, size_bytes, &stored_path)
            .await
        {
            Ok(record) => {
                info!(
                    owner_id,
                    filename = %record.original_filename,
                    version = record.version,
                    size = size_bytes,
                    "File uploaded"
                );
                Ok(record)
            }
            Err(e) => {
                warn!(
                    stored_path = %stored_path,
                    error = %e,
                    "Upload aborted after byte write; stored blob is orphaned"
                );
                Err(e)
            }
        }
    }

    /// Metadata and ledger half of the upload. Runs under the lineage
    /// lock, after the bytes are already stored. The ledger is re-read
    /// here so serialized uploads never overwrite each other's usage.
    async fn commit_upload(
        &self,
        owner_id: &str,
        request: &UploadRequest,
        size_bytes: i64,
        stored_path: &str,
    ) -> AppResult<FileVersion> {
        let previous = self
            .versions
            .find_latest(owner_id, &request.original_filename)
            .await?;
        let version = lineage::next_version(previous.as_ref());

        if let Some(previous) = &previous {
            self.versions.demote_latest(previous.id).await?;
        }

        let record = FileVersion::new(
            owner_id,
            request.original_filename.as_str(),
            stored_path,
            request.content_type.as_str(),
            size_bytes,
            version,
        );
        self.versions.insert(&record).await?;

        let mut owner = self.require_owner(owner_id).await?;
        owner.add_used(size_bytes);
        self.owners.save(&owner).await?;

        Ok(record)
    }
}

/// Last path component of a caller-supplied value, so a storage hint can
/// never traverse outside the owner's prefix.
fn path_safe(value: &str, fallback: &str) -> String {
    let base = value.rsplit(['/', '\\']).next().unwrap_or(value).trim();
    if base.is_empty() || base == "." || base == ".." {
        fallback.to_string()
    } else {
        base.to_string()
    }
}
