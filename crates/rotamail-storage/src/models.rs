//! Database models

use chrono::{DateTime, Utc};
use rotamail_common::types::{AccountId, AttemptId, AttemptStatus, Encryption};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// SMTP relay account model
///
/// The dispatch core receives these as a read-only snapshot per
/// campaign run; only the account store mutates rows.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SmtpAccount {
    pub id: AccountId,
    pub label: String,
    pub host: String,
    pub port: i32,
    pub username: String,
    pub password: String,
    pub encryption: String,
    pub from_name: String,
    pub from_email: String,
    /// Daily attempt cap; None means unlimited
    pub daily_limit: Option<i32>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl SmtpAccount {
    /// Typed view of the `encryption` column; unknown values fall back
    /// to STARTTLS, the submission-port default
    pub fn encryption_mode(&self) -> Encryption {
        self.encryption.parse().unwrap_or(Encryption::StartTls)
    }

    /// Display label, falling back to host and username like the
    /// account picker does
    pub fn display_label(&self) -> String {
        if self.label.is_empty() {
            format!("{} ({})", self.host, self.username)
        } else {
            self.label.clone()
        }
    }

    /// The account's own From identity in mailbox form; the username
    /// stands in when no from address is configured
    pub fn from_mailbox(&self) -> String {
        let email = if self.from_email.is_empty() {
            &self.username
        } else {
            &self.from_email
        };

        if self.from_name.is_empty() {
            email.clone()
        } else {
            format!("{} <{}>", self.from_name, email)
        }
    }
}

/// Input for creating an SMTP account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSmtpAccount {
    pub label: Option<String>,
    pub host: String,
    pub port: i32,
    pub username: String,
    pub password: String,
    pub encryption: Encryption,
    pub from_name: Option<String>,
    pub from_email: Option<String>,
    pub daily_limit: Option<i32>,
    pub active: bool,
}

/// Input for updating an SMTP account
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSmtpAccount {
    pub label: Option<String>,
    pub host: Option<String>,
    pub port: Option<i32>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub encryption: Option<Encryption>,
    pub from_name: Option<String>,
    pub from_email: Option<String>,
    /// Some(None) clears the limit
    pub daily_limit: Option<Option<i32>>,
    pub active: Option<bool>,
}

/// Delivery log row: one immutable record per processed recipient
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DeliveryAttempt {
    pub id: AttemptId,
    pub sent_at: DateTime<Utc>,
    pub recipient: String,
    pub subject: String,
    /// None means no account could be assigned (all quotas exhausted)
    pub smtp_account_id: Option<AccountId>,
    pub status: String,
    pub error: Option<String>,
    pub message_id: Option<String>,
}

impl DeliveryAttempt {
    /// Typed view of the `status` column
    pub fn attempt_status(&self) -> AttemptStatus {
        self.status.parse().unwrap_or(AttemptStatus::Failed)
    }
}

/// Input for appending a delivery log row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDeliveryAttempt {
    pub recipient: String,
    pub subject: String,
    pub smtp_account_id: Option<AccountId>,
    pub status: AttemptStatus,
    pub error: Option<String>,
    pub message_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn account() -> SmtpAccount {
        SmtpAccount {
            id: uuid::Uuid::new_v4(),
            label: String::new(),
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "mailer@example.com".to_string(),
            password: "secret".to_string(),
            encryption: "starttls".to_string(),
            from_name: String::new(),
            from_email: String::new(),
            daily_limit: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_encryption_mode_fallback() {
        let mut acc = account();
        assert_eq!(acc.encryption_mode(), Encryption::StartTls);

        acc.encryption = "tls".to_string();
        assert_eq!(acc.encryption_mode(), Encryption::Tls);

        acc.encryption = "garbage".to_string();
        assert_eq!(acc.encryption_mode(), Encryption::StartTls);
    }

    #[test]
    fn test_display_label_fallback() {
        let mut acc = account();
        assert_eq!(acc.display_label(), "smtp.example.com (mailer@example.com)");

        acc.label = "Primary relay".to_string();
        assert_eq!(acc.display_label(), "Primary relay");
    }
}
