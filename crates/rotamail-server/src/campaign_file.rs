//! Campaign file parsing
//!
//! The TOML campaign description is the batch-mode stand-in for the
//! bulk-send form: free-text recipient and header blocks, subject,
//! HTML body, rotation mode, an optional account subset, and an
//! optional From override.

use anyhow::{Context, Result};
use lettre::Address;
use rotamail_common::types::{AccountId, RotationMode};
use rotamail_core::campaign::{input, CampaignRequest, FromOverride};
use rotamail_storage::models::SmtpAccount;
use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub struct CampaignFile {
    /// One recipient per line: `email@domain` or `Name <email@domain>`
    pub recipients: String,
    pub subject: String,
    pub body_html: String,
    /// One raw header per line
    #[serde(default)]
    pub headers: String,
    #[serde(default)]
    pub rotation: RotationMode,
    /// Restrict the pool to these account ids; absent means all active
    pub smtp_ids: Option<Vec<AccountId>>,
    pub from: Option<FromSection>,
}

#[derive(Debug, Deserialize)]
pub struct FromSection {
    pub name: Option<String>,
    pub email: String,
}

impl CampaignFile {
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read campaign file")?;
        toml::from_str(&content).context("Failed to parse campaign file")
    }

    /// Resolve into the typed request the dispatcher consumes. An
    /// unparseable override address is dropped with a warning, the
    /// same way the bulk form discards an invalid From field.
    pub fn into_request(
        self,
        pool: Vec<SmtpAccount>,
        sample_limit: Option<usize>,
    ) -> CampaignRequest {
        let from_override = self.from.and_then(|from| {
            if from.email.parse::<Address>().is_err() {
                warn!(email = %from.email, "Ignoring invalid From override");
                return None;
            }
            Some(FromOverride {
                name: from.name,
                email: from.email,
            })
        });

        CampaignRequest {
            recipients: input::parse_recipients(&self.recipients),
            subject: self.subject,
            body_html: self.body_html,
            extra_headers: input::parse_headers(&self.headers),
            rotation: self.rotation,
            pool,
            from_override,
            sample_limit,
        }
    }
}
