//! HTTP client for the ADDS dataserver

use std::time::Duration;

use muckwx_core::{Observation, ObservationSource};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::decode::{decode, RawMetar};
use crate::{MetarError, MetarResult};

/// Dataserver endpoint and request tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddsConfig {
    /// Dataserver base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Report lookback window passed as hoursBeforeNow
    #[serde(default = "default_hours_before_now")]
    pub hours_before_now: u32,
}

fn default_base_url() -> String {
    "https://www.aviationweather.gov/adds/dataserver_current/httpparam".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_hours_before_now() -> u32 {
    3
}

impl Default for AddsConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            hours_before_now: default_hours_before_now(),
        }
    }
}

/// Client for the ADDS METAR feed
#[derive(Debug, Clone)]
pub struct AddsClient {
    client: Client,
    config: AddsConfig,
}

impl AddsClient {
    pub fn new(config: AddsConfig) -> MetarResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MetarError::Request(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn with_defaults() -> MetarResult<Self> {
        Self::new(AddsConfig::default())
    }

    fn request_url(&self, station: &str) -> MetarResult<Url> {
        Url::parse_with_params(
            &self.config.base_url,
            &[
                ("dataSource", "metars"),
                ("requestType", "retrieve"),
                ("format", "xml"),
                ("stationString", station),
                ("mostRecent", "true"),
                ("hoursBeforeNow", &self.config.hours_before_now.to_string()),
            ],
        )
        .map_err(|e| MetarError::Url(e.to_string()))
    }

    /// Fetch the most recent METAR for a station within the lookback window
    pub async fn fetch_latest(&self, station: &str) -> MetarResult<RawMetar> {
        let url = self.request_url(station)?;
        debug!(%url, "Requesting METAR");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MetarError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MetarError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| MetarError::Request(e.to_string()))?;

        decode(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| MetarError::NoReport(station.to_string()))
    }
}

/// Observation source bound to one station
pub struct AddsSource {
    client: AddsClient,
    station: String,
}

impl AddsSource {
    pub fn new(client: AddsClient, station: impl Into<String>) -> Self {
        Self {
            client,
            station: station.into(),
        }
    }

    pub fn station(&self) -> &str {
        &self.station
    }
}

#[async_trait::async_trait]
impl ObservationSource for AddsSource {
    async fn latest(&self) -> anyhow::Result<Observation> {
        let raw = self.client.fetch_latest(&self.station).await?;
        if let Some(observed_at) = raw.observation_time() {
            debug!(station = %self.station, %observed_at, "Fetched METAR");
        }
        Ok(raw.to_observation()?)
    }
}
