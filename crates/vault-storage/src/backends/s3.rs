//! S3-compatible object storage backend (requires the `s3` feature).
//!
//! Each operation is one network call against the bucket. Non-AWS
//! endpoints (MinIO and friends) are supported through an endpoint
//! override with path-style addressing. Read-after-write behavior is
//! whatever the object store provides; eventual-consistency windows are
//! not defended against here.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream as S3ByteStream;
use bytes::Bytes;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use vault_core::config::storage::S3StorageConfig;
use vault_core::error::{AppError, ErrorKind};
use vault_core::result::AppResult;
use vault_core::traits::storage::{ByteStream, StorageBackend};

/// S3-compatible storage backend.
#[derive(Debug, Clone)]
pub struct S3StorageBackend {
    client: Client,
    bucket: String,
}

impl S3StorageBackend {
    /// Create a new S3 backend from configuration.
    pub async fn new(config: &S3StorageConfig) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("S3 bucket name is not set"));
        }

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if !config.access_key.is_empty() {
            loader = loader.credentials_provider(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
                None,
                None,
                "vault-config",
            ));
        }

        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if !config.endpoint.is_empty() {
            builder = builder
                .endpoint_url(config.endpoint.clone())
                .force_path_style(true);
        }

        let client = Client::from_conf(builder.build());

        info!(
            bucket = %config.bucket,
            region = %config.region,
            "Initialized S3 storage backend"
        );

        Ok(Self {
            client,
            bucket: config.bucket.clone(),
        })
    }
}

#[async_trait]
impl StorageBackend for S3StorageBackend {
    fn backend_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok())
    }

    async fn store(&self, data: Bytes, path_hint: &str, content_type: &str) -> AppResult<String> {
        let size = data.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(path_hint)
            .content_type(content_type)
            .content_length(size as i64)
            .body(S3ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to store object: {path_hint}"),
                    e,
                )
            })?;

        debug!(path = path_hint, bytes = size, "Stored object");
        Ok(path_hint.to_string())
    }

    async fn fetch(&self, stored_path: &str) -> AppResult<ByteStream> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(stored_path)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    AppError::not_found(format!("Object not found: {stored_path}"))
                } else {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to fetch object: {stored_path}"),
                        service_err,
                    )
                }
            })?;

        Ok(Box::pin(ReaderStream::new(output.body.into_async_read())))
    }

    async fn fetch_bytes(&self, stored_path: &str) -> AppResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(stored_path)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_no_such_key() {
                    AppError::not_found(format!("Object not found: {stored_path}"))
                } else {
                    AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to fetch object: {stored_path}"),
                        service_err,
                    )
                }
            })?;

        let data = output.body.collect().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read object body: {stored_path}"),
                e,
            )
        })?;

        Ok(data.into_bytes())
    }

    async fn exists(&self, stored_path: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(stored_path)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(e) => {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to check object: {stored_path}"),
                        service_err,
                    ))
                }
            }
        }
    }

    async fn remove(&self, stored_path: &str) -> AppResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(stored_path)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to remove object: {stored_path}"),
                    e,
                )
            })?;

        debug!(path = stored_path, "Removed object");
        Ok(())
    }
}
