//! muckwx - real-world weather for a MUCK
//!
//! Fetches the latest METAR for the configured airport, renders it as a
//! few plain English sentences, and publishes the message to the MUCK
//! over MCP. One linear run per invocation; meant to be driven by cron.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use muckwx_config::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Explicit path argument wins over MUCKWX_CONFIG / config.toml
    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_path(&path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    let message = muckwx_cli::run(&config).await?;
    info!(%message, "Weather published");
    Ok(())
}
