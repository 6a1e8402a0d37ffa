//! Owner ledger domain entities.

pub mod model;

pub use model::Owner;
