//! File version domain entities.

pub mod lineage;
pub mod model;

pub use model::FileVersion;
