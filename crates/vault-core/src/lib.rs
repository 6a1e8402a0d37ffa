//! # vault-core
//!
//! Core crate for the file vault. Contains the storage backend trait,
//! configuration schemas, and the unified error system.
//!
//! This crate has **no** internal dependencies on other vault crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::AppError;
pub use result::AppResult;
