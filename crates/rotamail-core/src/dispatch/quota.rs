//! Quota Tracker - Per-account daily attempt caps

use chrono::Utc;
use rotamail_common::Result;
use rotamail_storage::models::SmtpAccount;
use rotamail_storage::repository::LogStore;
use std::sync::Arc;
use tracing::debug;

/// Thin policy wrapper over the delivery log's per-day count.
///
/// Accounts without a limit short-circuit without touching the log,
/// so the common unlimited case costs no query. Every logged attempt
/// counts toward the cap, failed ones included.
pub struct QuotaTracker {
    log_store: Arc<dyn LogStore>,
}

impl QuotaTracker {
    pub fn new(log_store: Arc<dyn LogStore>) -> Self {
        Self { log_store }
    }

    /// True iff the account may still be charged an attempt on the
    /// current UTC calendar day
    pub async fn has_quota_remaining(&self, account: &SmtpAccount) -> Result<bool> {
        let Some(limit) = account.daily_limit else {
            return Ok(true);
        };

        let today = Utc::now().date_naive();
        let count = self
            .log_store
            .count_for_account_on_date(account.id, today)
            .await?;

        if count >= limit as i64 {
            debug!(
                account = %account.display_label(),
                count,
                limit,
                "Daily limit reached"
            );
            return Ok(false);
        }

        Ok(true)
    }
}
