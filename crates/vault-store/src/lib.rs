//! # vault-store
//!
//! Metadata persistence for the file vault: PostgreSQL repositories for
//! version records and the owner ledger, an in-memory implementation of
//! the same contracts, connection pool management, and schema bootstrap.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::{MemoryOwnerStore, MemoryVersionStore};
pub use repositories::{PgOwnerStore, PgVersionStore};
