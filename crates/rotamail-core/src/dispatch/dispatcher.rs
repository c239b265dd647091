//! Dispatch Loop - Per-recipient account assignment, send, and logging

use super::quota::QuotaTracker;
use super::selector::AccountSelector;
use crate::campaign::{CampaignRequest, DispatchSummary, Recipient};
use crate::transport::{MailTransport, OutgoingMessage};
use rotamail_common::types::AttemptStatus;
use rotamail_storage::models::{NewDeliveryAttempt, SmtpAccount};
use rotamail_storage::repository::LogStore;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Error text logged for a recipient no account could take
pub const QUOTA_EXHAUSTED_ERROR: &str = "All SMTP daily limits exhausted.";

/// Fallback error text when the transport fails without a reason
const GENERIC_SEND_ERROR: &str = "Transport reported failure";

/// Errors that abort a run before any log row is written.
///
/// Once the loop starts, per-recipient problems (quota exhaustion,
/// transport failures) are logged and counted, never raised; only a
/// delivery-log write failure can still end a run early, since quota
/// enforcement depends on appends being durable.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Campaign has no recipients")]
    EmptyRecipients,

    #[error("Campaign subject is empty")]
    EmptySubject,

    #[error("Campaign body is empty")]
    EmptyBody,

    #[error("No active SMTP accounts available")]
    NoAccountsAvailable,

    #[error(transparent)]
    Storage(#[from] rotamail_common::Error),
}

/// The dispatch core: iterates a campaign's recipients in order,
/// assigns each one an account, invokes the transport, and appends
/// exactly one delivery log row per processed recipient.
///
/// Collaborators are injected at construction; the dispatcher itself
/// holds no per-run state, so one instance serves any number of runs.
pub struct Dispatcher {
    log_store: Arc<dyn LogStore>,
    transport: Arc<dyn MailTransport>,
    quota: QuotaTracker,
}

impl Dispatcher {
    pub fn new(log_store: Arc<dyn LogStore>, transport: Arc<dyn MailTransport>) -> Self {
        let quota = QuotaTracker::new(Arc::clone(&log_store));
        Self {
            log_store,
            transport,
            quota,
        }
    }

    /// Execute one dispatch run.
    ///
    /// Recipients are processed strictly in sequence: the quota count
    /// seen at recipient `i + 1` includes the row appended for
    /// recipient `i`, and round-robin assignment advances by position.
    /// Cancellation is honored between recipients; a recipient either
    /// gets a full log row or is never started.
    pub async fn run(
        &self,
        request: &CampaignRequest,
        cancel: &CancellationToken,
    ) -> Result<DispatchSummary, DispatchError> {
        Self::validate(request)?;

        let limit = request.effective_len();
        info!(
            recipients = limit,
            pool = request.pool.len(),
            rotation = %request.rotation,
            "Starting dispatch run"
        );

        let mut summary = DispatchSummary::default();

        for index in 0..limit {
            if cancel.is_cancelled() {
                warn!(
                    processed = summary.processed,
                    remaining = limit - summary.processed,
                    "Dispatch run cancelled"
                );
                break;
            }

            let recipient = &request.recipients[index];

            let Some(account) = self.assign_account(request, index).await? else {
                self.log_store
                    .append(NewDeliveryAttempt {
                        recipient: recipient.email.clone(),
                        subject: request.subject.clone(),
                        smtp_account_id: None,
                        status: AttemptStatus::Failed,
                        error: Some(QUOTA_EXHAUSTED_ERROR.to_string()),
                        message_id: None,
                    })
                    .await?;

                summary.processed += 1;
                summary.failed += 1;
                continue;
            };

            let message = Self::build_message(request, recipient, account);
            let result = self.transport.send(account, &message).await;

            let (status, error) = if result.ok {
                summary.sent += 1;
                (AttemptStatus::Sent, None)
            } else {
                summary.failed += 1;
                let error = result
                    .error
                    .unwrap_or_else(|| GENERIC_SEND_ERROR.to_string());
                warn!(
                    recipient = %recipient.email,
                    account = %account.display_label(),
                    error = %error,
                    "Send failed"
                );
                (AttemptStatus::Failed, Some(error))
            };

            self.log_store
                .append(NewDeliveryAttempt {
                    recipient: recipient.email.clone(),
                    subject: request.subject.clone(),
                    smtp_account_id: Some(account.id),
                    status,
                    error,
                    message_id: result.message_id,
                })
                .await?;

            summary.processed += 1;
        }

        info!(
            processed = summary.processed,
            sent = summary.sent,
            failed = summary.failed,
            "Dispatch run finished"
        );

        Ok(summary)
    }

    /// Reject bad input before any log row is written
    fn validate(request: &CampaignRequest) -> Result<(), DispatchError> {
        if request.recipients.is_empty() {
            return Err(DispatchError::EmptyRecipients);
        }
        if request.subject.is_empty() {
            return Err(DispatchError::EmptySubject);
        }
        if request.body_html.is_empty() {
            return Err(DispatchError::EmptyBody);
        }
        if request.pool.is_empty() {
            return Err(DispatchError::NoAccountsAvailable);
        }
        Ok(())
    }

    /// Pick the account for recipient `index`: the rotation's primary
    /// choice when it has quota left, otherwise the first of up to
    /// `pool.len()` further candidates at offsets `index + 1 ..` that
    /// does. Offsets wrap modulo the pool, so a small pool may revisit
    /// an account already found exhausted; each candidate's own limit
    /// is re-checked, so that only costs a query. None means no
    /// account in the pool can take this recipient today.
    async fn assign_account<'a>(
        &self,
        request: &'a CampaignRequest,
        index: usize,
    ) -> Result<Option<&'a SmtpAccount>, DispatchError> {
        let Some(primary) = AccountSelector::select(&request.pool, index, request.rotation) else {
            return Ok(None);
        };

        if self.quota.has_quota_remaining(primary).await? {
            return Ok(Some(primary));
        }

        for offset in 1..=request.pool.len() {
            let Some(candidate) =
                AccountSelector::select(&request.pool, index + offset, request.rotation)
            else {
                break;
            };

            if self.quota.has_quota_remaining(candidate).await? {
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }

    /// Resolve the outgoing message for one recipient: campaign
    /// headers plus a synthesized From line when the override is set;
    /// the override also wins as the transport From identity.
    fn build_message(
        request: &CampaignRequest,
        recipient: &Recipient,
        account: &SmtpAccount,
    ) -> OutgoingMessage {
        let mut headers = request.extra_headers.clone();

        let from = match &request.from_override {
            Some(over) => {
                let mailbox = over.mailbox();
                headers.push(format!("From: {}", mailbox));
                mailbox
            }
            None => account.from_mailbox(),
        };

        OutgoingMessage {
            from,
            to: recipient.mailbox(),
            subject: request.subject.clone(),
            body_html: request.body_html.clone(),
            headers,
        }
    }
}
