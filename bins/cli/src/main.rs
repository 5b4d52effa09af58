//! Filterlink CLI
//!
//! Logs in to a dashboard server, applies the configured filter edits on top
//! of the dashboard's defaults, and prints the shareable link.

mod edit;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filterlink_client::{DashboardClient, DashboardFilterSession};
use filterlink_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filterlink=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Parse every edit up front so a typo fails before any request is sent
    let edits = config
        .dashboard
        .edits
        .iter()
        .map(|e| {
            edit::to_filter_edit(&e.edit)
                .with_context(|| format!("Invalid edit for filter '{}'", e.filter))
                .map(|parsed| (e.filter.as_str(), parsed))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let client = DashboardClient::new(&config.server)?;
    info!(base_url = %client.base(), dashboard_id = %config.dashboard.id, "Opening dashboard");

    let mut session = DashboardFilterSession::open(
        &client,
        &config.credentials.username,
        &config.credentials.password,
        config.dashboard.id.clone(),
    )
    .await?;

    for skipped in session.skipped() {
        warn!(%skipped, "Filter left at server default");
    }

    for (filter, edit) in &edits {
        session.apply(filter, edit)?;
    }
    info!(edits = edits.len(), "Filter edits applied");

    let url = session.share().await?;
    println!("{url}");

    Ok(())
}
