//! RotaMail - Campaign runner entry point
//!
//! Loads a campaign description from a TOML file, wires the dispatch
//! core to the Postgres-backed stores and the lettre transport, and
//! runs one dispatch. `--test` caps the run to the configured dry-run
//! sample.

mod campaign_file;

use anyhow::{bail, Context, Result};
use campaign_file::CampaignFile;
use rotamail_common::config::Config;
use rotamail_core::transport::SmtpMailTransport;
use rotamail_core::Dispatcher;
use rotamail_storage::repository::{AccountRepository, AccountStore, LogRepository};
use rotamail_storage::DatabasePool;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let (campaign_path, test_mode) = parse_args()?;

    // Load configuration
    let config = Config::load()?;

    // Initialize database
    let db_pool = DatabasePool::new(&config.database).await?;
    db_pool.migrate().await?;

    // Wire the dispatch core to its collaborators
    let account_store = AccountRepository::new(db_pool.clone());
    let log_store = Arc::new(LogRepository::new(db_pool.clone()));
    let transport = Arc::new(SmtpMailTransport::new(Duration::from_secs(
        config.smtp.send_timeout_secs,
    )));
    let dispatcher = Dispatcher::new(log_store, transport);

    // Build the campaign request from the file
    let campaign = CampaignFile::from_file(&campaign_path)
        .with_context(|| format!("Failed to load campaign file {}", campaign_path))?;

    let pool = account_store
        .list_active(campaign.smtp_ids.as_deref())
        .await?;

    let sample_limit = test_mode.then_some(config.dispatch.test_sample_limit);
    if let Some(limit) = sample_limit {
        info!(limit, "Test mode: sampling the first recipients only");
    }

    let request = campaign.into_request(pool, sample_limit);

    // Cancel cooperatively on ctrl-c; the recipient in flight still
    // gets its log row, nothing after it is started
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Shutdown signal received, finishing current recipient");
                cancel.cancel();
            }
        });
    }

    let summary = dispatcher.run(&request, &cancel).await?;

    info!(
        processed = summary.processed,
        sent = summary.sent,
        failed = summary.failed,
        "Campaign dispatch complete"
    );

    Ok(())
}

fn parse_args() -> Result<(String, bool)> {
    let mut path = None;
    let mut test_mode = false;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--test" => test_mode = true,
            other if path.is_none() => path = Some(other.to_string()),
            other => bail!("Unexpected argument: {}", other),
        }
    }

    match path {
        Some(path) => Ok((path, test_mode)),
        None => bail!("Usage: rotamail <campaign.toml> [--test]"),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,rotamail=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_level(true))
        .with(filter)
        .init();
}
