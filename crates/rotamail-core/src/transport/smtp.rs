//! lettre-backed SMTP transport

use super::{MailTransport, OutgoingMessage, SendResult};
use async_trait::async_trait;
use chrono::Utc;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use rotamail_common::types::Encryption;
use rotamail_storage::models::SmtpAccount;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// Production transport: one lettre mailer built per send, from the
/// selected account's connection parameters
pub struct SmtpMailTransport {
    timeout: Duration,
}

impl SmtpMailTransport {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn build_message(message: &OutgoingMessage, msg_id: &str) -> Result<Message, String> {
        let from: Mailbox = message
            .from
            .parse()
            .map_err(|e| format!("Invalid from address: {}", e))?;

        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| format!("Invalid to address: {}", e))?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(&message.subject)
            .message_id(Some(msg_id.to_string()));

        // lettre's builder only takes typed headers. Reply-To is the
        // one the bulk form suggests; anything else is skipped.
        for line in &message.headers {
            let Some((name, value)) = line.split_once(':') else {
                debug!(header = %line, "Skipping malformed header line");
                continue;
            };

            if name.trim().eq_ignore_ascii_case("reply-to") {
                match value.trim().parse::<Mailbox>() {
                    Ok(reply_to) => builder = builder.reply_to(reply_to),
                    Err(e) => debug!(header = %line, "Skipping unparseable Reply-To: {}", e),
                }
            } else {
                debug!(header = %line, "Header not representable through lettre, skipping");
            }
        }

        builder
            .header(ContentType::TEXT_HTML)
            .body(message.body_html.clone())
            .map_err(|e| format!("Failed to build email: {}", e))
    }

    fn build_mailer(
        &self,
        account: &SmtpAccount,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, String> {
        let mut transport = match account.encryption_mode() {
            Encryption::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&account.host)
                .map_err(|e| format!("Failed to create SMTP transport: {}", e))?,
            Encryption::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&account.host)
                    .map_err(|e| format!("Failed to create SMTP transport: {}", e))?
            }
            Encryption::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&account.host)
            }
        }
        .port(account.port as u16);

        if !account.username.is_empty() {
            transport = transport.credentials(Credentials::new(
                account.username.clone(),
                account.password.clone(),
            ));
        }

        Ok(transport.timeout(Some(self.timeout)).build())
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, account: &SmtpAccount, message: &OutgoingMessage) -> SendResult {
        let msg_id = format!("<{}.{}@rotamail>", Uuid::new_v4(), Utc::now().timestamp());

        let email = match Self::build_message(message, &msg_id) {
            Ok(email) => email,
            Err(e) => return SendResult::failure(e),
        };

        let mailer = match self.build_mailer(account) {
            Ok(mailer) => mailer,
            Err(e) => return SendResult::failure(e),
        };

        match mailer.send(email).await {
            Ok(response) => {
                debug!(host = %account.host, code = ?response.code(), "Message accepted by relay");
                SendResult::sent(Some(msg_id))
            }
            Err(e) => SendResult::failure(e.to_string()),
        }
    }
}
