//! Mail transport seam
//!
//! The dispatch loop talks SMTP through [`MailTransport`]. The account
//! is passed explicitly per call; there is no shared "current SMTP"
//! state anywhere. [`SmtpMailTransport`] is the lettre-backed
//! production implementation; tests substitute their own.

mod smtp;

pub use smtp::SmtpMailTransport;

use async_trait::async_trait;
use rotamail_storage::models::SmtpAccount;

/// One message, fully resolved for a single recipient
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    /// From identity in mailbox form; the campaign override has
    /// already won over the account identity by the time this is built
    pub from: String,
    /// Recipient in mailbox form
    pub to: String,
    pub subject: String,
    pub body_html: String,
    /// Raw header lines, e.g. `Reply-To: you@example.com`
    pub headers: Vec<String>,
}

/// Outcome of one transport call
#[derive(Debug, Clone)]
pub struct SendResult {
    pub ok: bool,
    pub message_id: Option<String>,
    pub error: Option<String>,
}

impl SendResult {
    pub fn sent(message_id: Option<String>) -> Self {
        Self {
            ok: true,
            message_id,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

/// Performs the actual SMTP conversation for one message
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Send `message` through `account`'s relay. Errors are reported
    /// in the result, never panicked or propagated; the dispatch loop
    /// records them and moves on.
    async fn send(&self, account: &SmtpAccount, message: &OutgoingMessage) -> SendResult;
}
