//! Per-lineage serialization for metadata transitions.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;

/// Registry of per-lineage mutexes.
///
/// A lineage key is the `(owner_id, original_filename)` pair. The mutex
/// is held only for the read-compute-flip-insert metadata step of an
/// operation, never across a byte transfer. Entries are created on first
/// use and live for the process lifetime; the map is bounded by the set
/// of lineages this process has touched.
#[derive(Debug, Default)]
pub struct LineageLocks {
    locks: DashMap<(String, String), Arc<Mutex<()>>>,
}

impl LineageLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the mutex guarding one lineage.
    pub fn lock_for(&self, owner_id: &str, original_filename: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry((owner_id.to_string(), original_filename.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
