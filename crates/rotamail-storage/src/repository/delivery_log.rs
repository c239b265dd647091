//! Delivery log repository
//!
//! Append-only: rows are written once per processed recipient and
//! never updated or deleted here. The per-account daily quota check
//! counts rows from this table, so `append` must be durable before it
//! returns.

use crate::db::DatabasePool;
use crate::models::{DeliveryAttempt, NewDeliveryAttempt};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime};
use rotamail_common::types::{AccountId, AttemptStatus};
use rotamail_common::{Error, Result};
use uuid::Uuid;

/// Maximum rows a report search returns
pub const REPORT_PAGE_SIZE: i64 = 200;

/// Delivery log consumed by the dispatch core
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Append one attempt record; durable before returning
    async fn append(&self, attempt: NewDeliveryAttempt) -> Result<DeliveryAttempt>;

    /// Count attempts charged to an account on a UTC calendar date.
    /// Every row counts toward the quota, failures included.
    async fn count_for_account_on_date(
        &self,
        account_id: AccountId,
        date: NaiveDate,
    ) -> Result<i64>;
}

/// Filters for the reporting surface
#[derive(Debug, Clone, Default)]
pub struct LogSearch {
    /// Restrict to one status
    pub status: Option<AttemptStatus>,
    /// Substring match over recipient or subject
    pub query: Option<String>,
}

/// Database-backed delivery log
#[derive(Clone)]
pub struct DbLogStore {
    pool: DatabasePool,
}

impl DbLogStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Most recent attempts matching the filters, newest first,
    /// capped at [`REPORT_PAGE_SIZE`]
    pub async fn search(&self, search: &LogSearch) -> Result<Vec<DeliveryAttempt>> {
        let pattern = search.query.as_ref().map(|q| format!("%{}%", q));

        sqlx::query_as::<_, DeliveryAttempt>(
            r#"
            SELECT * FROM delivery_attempts
            WHERE ($1::TEXT IS NULL OR status = $1)
              AND ($2::TEXT IS NULL OR recipient ILIKE $2 OR subject ILIKE $2)
            ORDER BY sent_at DESC, id DESC
            LIMIT $3
            "#,
        )
        .bind(search.status.map(|s| s.to_string()))
        .bind(pattern)
        .bind(REPORT_PAGE_SIZE)
        .fetch_all(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }
}

#[async_trait]
impl LogStore for DbLogStore {
    async fn append(&self, attempt: NewDeliveryAttempt) -> Result<DeliveryAttempt> {
        let id = Uuid::new_v4();

        sqlx::query_as::<_, DeliveryAttempt>(
            r#"
            INSERT INTO delivery_attempts (
                id, recipient, subject, smtp_account_id, status, error, message_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&attempt.recipient)
        .bind(&attempt.subject)
        .bind(attempt.smtp_account_id)
        .bind(attempt.status.to_string())
        .bind(&attempt.error)
        .bind(&attempt.message_id)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    async fn count_for_account_on_date(
        &self,
        account_id: AccountId,
        date: NaiveDate,
    ) -> Result<i64> {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);

        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM delivery_attempts
            WHERE smtp_account_id = $1
              AND sent_at >= $2
              AND sent_at < $3
            "#,
        )
        .bind(account_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(count.0)
    }
}
