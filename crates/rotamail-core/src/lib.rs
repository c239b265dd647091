//! RotaMail Core - Bulk dispatch engine
//!
//! This crate provides the dispatch core: account rotation, per-account
//! daily quota enforcement with fallback search, the per-recipient
//! dispatch loop, and the lettre-backed mail transport.

pub mod campaign;
pub mod dispatch;
pub mod transport;

pub use campaign::{CampaignRequest, DispatchSummary, FromOverride, Recipient};
pub use dispatch::{AccountSelector, Dispatcher, DispatchError, QuotaTracker};
pub use transport::{MailTransport, OutgoingMessage, SendResult, SmtpMailTransport};
