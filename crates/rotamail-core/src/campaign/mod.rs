//! Campaign request types
//!
//! A [`CampaignRequest`] is constructed once by the caller (typically
//! through the [`input`] parsing boundary) and consumed by a single
//! dispatch run. The dispatch core never mutates it.

pub mod input;

use rotamail_common::types::RotationMode;
use rotamail_storage::models::SmtpAccount;
use serde::{Deserialize, Serialize};

/// One recipient of a campaign; the address is already validated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub name: Option<String>,
}

impl Recipient {
    /// RFC 5322 mailbox form: `Name <email>` or the bare address
    pub fn mailbox(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => format!("{} <{}>", name, self.email),
            _ => self.email.clone(),
        }
    }
}

/// Campaign-level From override; takes precedence over the selected
/// account's own identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FromOverride {
    pub name: Option<String>,
    pub email: String,
}

impl FromOverride {
    /// Mailbox form, used both for the transport From identity and
    /// the synthesized `From:` header line
    pub fn mailbox(&self) -> String {
        match &self.name {
            Some(name) if !name.is_empty() => format!("{} <{}>", name, self.email),
            _ => self.email.clone(),
        }
    }
}

/// Sole input to a dispatch run
#[derive(Debug, Clone)]
pub struct CampaignRequest {
    /// Recipients in the order they will be processed
    pub recipients: Vec<Recipient>,
    pub subject: String,
    pub body_html: String,
    /// Raw header lines merged into every outgoing message
    pub extra_headers: Vec<String>,
    pub rotation: RotationMode,
    /// Active accounts eligible for this run; read-only snapshot
    pub pool: Vec<SmtpAccount>,
    pub from_override: Option<FromOverride>,
    /// Caps processing to the first N recipients (dry-run sampling)
    pub sample_limit: Option<usize>,
}

impl CampaignRequest {
    /// Number of recipients this run will actually process
    pub fn effective_len(&self) -> usize {
        match self.sample_limit {
            Some(limit) => limit.min(self.recipients.len()),
            None => self.recipients.len(),
        }
    }
}

/// Aggregate counts reported after a dispatch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub processed: usize,
    pub sent: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_recipient_mailbox_forms() {
        let plain = Recipient {
            email: "one@example.com".to_string(),
            name: None,
        };
        assert_eq!(plain.mailbox(), "one@example.com");

        let named = Recipient {
            email: "two@example.com".to_string(),
            name: Some("Two".to_string()),
        };
        assert_eq!(named.mailbox(), "Two <two@example.com>");

        let empty_name = Recipient {
            email: "three@example.com".to_string(),
            name: Some(String::new()),
        };
        assert_eq!(empty_name.mailbox(), "three@example.com");
    }

    #[test]
    fn test_from_override_mailbox() {
        let bare = FromOverride {
            name: None,
            email: "no-reply@example.com".to_string(),
        };
        assert_eq!(bare.mailbox(), "no-reply@example.com");

        let named = FromOverride {
            name: Some("Campaigns".to_string()),
            email: "no-reply@example.com".to_string(),
        };
        assert_eq!(named.mailbox(), "Campaigns <no-reply@example.com>");
    }
}
