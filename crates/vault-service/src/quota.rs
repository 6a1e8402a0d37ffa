//! Credit-funded storage upgrades.

use tracing::info;

use vault_core::error::AppError;
use vault_core::result::AppResult;
use vault_entity::owner::Owner;

use crate::service::VaultService;

impl VaultService {
    /// Spends the owner's credits to raise their storage limit by
    /// `credits × quota.storage_per_credit_bytes`.
    ///
    /// Returns the updated ledger record. Nothing is mutated when the
    /// credits are non-positive or the balance is too low.
    pub async fn spend_credits_for_storage(
        &self,
        owner_id: &str,
        credits: i32,
    ) -> AppResult<Owner> {
        if credits <= 0 {
            return Err(AppError::validation("Credits must be greater than 0"));
        }

        let mut owner = self.require_owner(owner_id).await?;
        owner.spend_credits(credits)?;
        owner.increase_limit(i64::from(credits) * self.quota_config.storage_per_credit_bytes);
        self.owners.save(&owner).await?;

        info!(
            owner_id,
            credits,
            new_limit = owner.limit_bytes,
            remaining_credits = owner.credits,
            "Storage limit upgraded"
        );

        Ok(owner)
    }

    /// Alias for callers that speak in terms of storage upgrades.
    pub async fn upgrade_storage(&self, owner_id: &str, credits: i32) -> AppResult<Owner> {
        self.spend_credits_for_storage(owner_id, credits).await
    }
}
