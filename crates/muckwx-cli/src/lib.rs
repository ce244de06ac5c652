//! Pipeline wiring for the muckwx binary

use anyhow::{Context, Result};
use muckwx_config::AppConfig;
use muckwx_core::{describe, ObservationSource, ReportSink};
use muckwx_mcp::MuckSink;
use muckwx_metar::{AddsClient, AddsConfig, AddsSource};
use tracing::info;

/// Fetch one observation, describe it, publish the message.
///
/// Returns the published message so the caller can log it. Generic over
/// the core traits so tests can drive it with fakes.
pub async fn run_pipeline<S, K>(source: &S, sink: &mut K) -> Result<String>
where
    S: ObservationSource,
    K: ReportSink,
{
    let observation = source
        .latest()
        .await
        .context("Failed to fetch observation")?;

    let report = describe(&observation);
    let message = report.to_message();
    info!(sentences = report.len(), "Composed weather report");

    sink.publish(&message)
        .await
        .context("Failed to publish weather message")?;

    Ok(message)
}

/// Build the concrete source and sink from configuration and run once
pub async fn run(config: &AppConfig) -> Result<String> {
    let mut adds = AddsConfig::default();
    if let Some(url) = &config.weather.adds_url {
        adds.base_url = url.clone();
    }
    if let Some(secs) = config.weather.timeout_secs {
        adds.timeout_secs = secs;
    }
    if let Some(hours) = config.weather.hours_before_now {
        adds.hours_before_now = hours;
    }

    let client = AddsClient::new(adds).context("Failed to build METAR client")?;
    let source = AddsSource::new(client, config.weather.airport.clone());

    let mut sink = MuckSink::new(
        config.muck.host.clone(),
        config.muck.port,
        config.use_ssl(),
        config.package(),
        config.muck.auth_token.clone(),
    )
    .context("Invalid MUCK sink configuration")?;

    info!(
        station = %config.weather.airport,
        muck = %config.muck.host,
        "Running weather publish"
    );
    run_pipeline(&source, &mut sink).await
}
