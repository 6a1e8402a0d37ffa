//! Owner quota ledger entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use vault_core::error::AppError;
use vault_core::result::AppResult;

/// Credits granted to a newly provisioned owner.
pub const DEFAULT_CREDITS: i32 = 10;

/// Storage limit granted to a newly provisioned owner (500 MiB).
pub const DEFAULT_LIMIT_BYTES: i64 = 500 * 1024 * 1024;

/// Per-owner storage ledger: credits, used bytes, and the byte limit.
///
/// All mutations here are pure, in-memory bookkeeping; persisting the
/// updated record is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Owner {
    /// Authenticated identity of the owner. Opaque to this system.
    pub id: String,
    /// Credits available to purchase additional storage.
    pub credits: i32,
    /// Bytes currently counted against the limit.
    pub used_bytes: i64,
    /// Maximum bytes this owner may consume.
    pub limit_bytes: i64,
    /// When the ledger record was created.
    pub created_at: DateTime<Utc>,
    /// When the ledger record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Owner {
    /// Create a ledger record with an explicit allowance.
    pub fn new(id: impl Into<String>, credits: i32, limit_bytes: i64) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            credits,
            used_bytes: 0,
            limit_bytes,
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a ledger record with the standard new-owner allowance.
    pub fn with_default_allowance(id: impl Into<String>) -> Self {
        Self::new(id, DEFAULT_CREDITS, DEFAULT_LIMIT_BYTES)
    }

    /// Bytes still available before the limit is reached.
    pub fn available_bytes(&self) -> i64 {
        (self.limit_bytes - self.used_bytes).max(0)
    }

    /// Whether adding `bytes` would push usage past the limit.
    pub fn would_exceed(&self, bytes: i64) -> bool {
        self.used_bytes + bytes > self.limit_bytes
    }

    /// Count `bytes` against the limit.
    pub fn add_used(&mut self, bytes: i64) {
        self.used_bytes += bytes;
        self.updated_at = Utc::now();
    }

    /// Release `bytes` from the counted usage, flooring at 0.
    pub fn remove_used(&mut self, bytes: i64) {
        self.used_bytes = (self.used_bytes - bytes).max(0);
        self.updated_at = Utc::now();
    }

    /// Deduct credits, failing if the balance is too low.
    pub fn spend_credits(&mut self, amount: i32) -> AppResult<()> {
        if self.credits < amount {
            return Err(AppError::insufficient_credits(format!(
                "Owner has {} credits, needs {amount}",
                self.credits
            )));
        }
        self.credits -= amount;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Raise the byte limit.
    pub fn increase_limit(&mut self, bytes: i64) {
        self.limit_bytes += bytes;
        self.updated_at = Utc::now();
    }
}
