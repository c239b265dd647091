//! SMTP account repository

use crate::db::DatabasePool;
use crate::models::{CreateSmtpAccount, SmtpAccount, UpdateSmtpAccount};
use async_trait::async_trait;
use rotamail_common::types::AccountId;
use rotamail_common::{Error, Result};
use uuid::Uuid;

/// Account store consumed by the dispatch core
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// List active accounts, optionally restricted to an id subset
    async fn list_active(&self, ids: Option<&[AccountId]>) -> Result<Vec<SmtpAccount>>;
}

/// Database-backed account store
///
/// Also carries the CRUD surface the account-management collaborator
/// calls; the dispatch core only ever sees `AccountStore`.
#[derive(Clone)]
pub struct DbAccountStore {
    pool: DatabasePool,
}

impl DbAccountStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Create an SMTP account
    pub async fn create(&self, input: CreateSmtpAccount) -> Result<SmtpAccount> {
        let id = Uuid::new_v4();

        sqlx::query_as::<_, SmtpAccount>(
            r#"
            INSERT INTO smtp_accounts (
                id, label, host, port, username, password, encryption,
                from_name, from_email, daily_limit, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.label.unwrap_or_default())
        .bind(&input.host)
        .bind(input.port)
        .bind(&input.username)
        .bind(&input.password)
        .bind(input.encryption.to_string())
        .bind(input.from_name.unwrap_or_default())
        .bind(input.from_email.unwrap_or_default())
        .bind(input.daily_limit)
        .bind(input.active)
        .fetch_one(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Get an account by ID
    pub async fn get(&self, id: AccountId) -> Result<Option<SmtpAccount>> {
        sqlx::query_as::<_, SmtpAccount>("SELECT * FROM smtp_accounts WHERE id = $1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// List all accounts, oldest first
    pub async fn list(&self) -> Result<Vec<SmtpAccount>> {
        sqlx::query_as::<_, SmtpAccount>("SELECT * FROM smtp_accounts ORDER BY created_at ASC")
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))
    }

    /// Update an account; unset fields keep their current value
    pub async fn update(
        &self,
        id: AccountId,
        input: UpdateSmtpAccount,
    ) -> Result<Option<SmtpAccount>> {
        sqlx::query_as::<_, SmtpAccount>(
            r#"
            UPDATE smtp_accounts SET
                label = COALESCE($2, label),
                host = COALESCE($3, host),
                port = COALESCE($4, port),
                username = COALESCE($5, username),
                password = COALESCE($6, password),
                encryption = COALESCE($7, encryption),
                from_name = COALESCE($8, from_name),
                from_email = COALESCE($9, from_email),
                daily_limit = CASE WHEN $10 THEN $11 ELSE daily_limit END,
                active = COALESCE($12, active)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(input.label)
        .bind(input.host)
        .bind(input.port)
        .bind(input.username)
        .bind(input.password)
        .bind(input.encryption.map(|e| e.to_string()))
        .bind(input.from_name)
        .bind(input.from_email)
        .bind(input.daily_limit.is_some())
        .bind(input.daily_limit.flatten())
        .bind(input.active)
        .fetch_optional(self.pool.pool())
        .await
        .map_err(|e| Error::Database(e.to_string()))
    }

    /// Delete an account
    pub async fn delete(&self, id: AccountId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM smtp_accounts WHERE id = $1")
            .bind(id)
            .execute(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl AccountStore for DbAccountStore {
    async fn list_active(&self, ids: Option<&[AccountId]>) -> Result<Vec<SmtpAccount>> {
        match ids {
            Some(ids) => sqlx::query_as::<_, SmtpAccount>(
                r#"
                SELECT * FROM smtp_accounts
                WHERE active AND id = ANY($1)
                ORDER BY created_at ASC
                "#,
            )
            .bind(ids)
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string())),
            None => sqlx::query_as::<_, SmtpAccount>(
                "SELECT * FROM smtp_accounts WHERE active ORDER BY created_at ASC",
            )
            .fetch_all(self.pool.pool())
            .await
            .map_err(|e| Error::Database(e.to_string())),
        }
    }
}
