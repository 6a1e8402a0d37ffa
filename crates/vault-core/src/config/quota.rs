//! Storage quota and credit configuration.

use serde::{Deserialize, Serialize};

/// Credit-to-storage exchange configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Bytes of storage limit granted per spent credit (default 100 MiB).
    #[serde(default = "default_storage_per_credit")]
    pub storage_per_credit_bytes: i64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            storage_per_credit_bytes: default_storage_per_credit(),
        }
    }
}

fn default_storage_per_credit() -> i64 {
    100 * 1024 * 1024 // 100 MiB
}
