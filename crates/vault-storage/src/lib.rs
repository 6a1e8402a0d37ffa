//! # vault-storage
//!
//! Byte-blob storage backends for the file vault: local filesystem and
//! S3-compatible object stores. Backends store opaque blobs by path and
//! know nothing about versions or quotas.

pub mod backends;

pub use backends::LocalStorageBackend;
#[cfg(feature = "s3")]
pub use backends::S3StorageBackend;
pub use backends::backend_from_config;
