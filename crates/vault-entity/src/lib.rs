//! # vault-entity
//!
//! Domain entity models and persistence contracts for the file vault.
//! Entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and
//! `sqlx::FromRow`; the lineage module holds the pure promotion/demotion
//! rules the service applies to fetched version lists.

pub mod file;
pub mod owner;
pub mod store;

pub use file::FileVersion;
pub use owner::Owner;
pub use store::{OwnerStore, VersionStore};
