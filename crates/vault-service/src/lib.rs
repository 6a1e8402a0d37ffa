//! # vault-service
//!
//! Business logic for the file vault: versioned uploads, listing,
//! download, soft-delete/restore, and credit-funded storage upgrades.
//! The service orchestrates the version store, owner ledger, and storage
//! backend through constructor-injected `Arc` references and owns the
//! lineage invariants: one live latest per lineage, strictly increasing
//! version numbers, quota checked before any byte is counted.

pub mod download;
pub mod lifecycle;
pub mod locks;
pub mod quota;
pub mod service;
pub mod upload;

pub use download::DownloadResult;
pub use service::VaultService;
pub use upload::UploadRequest;
