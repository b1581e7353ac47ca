use crate::Config;
use crate::error::FetchError;
use crate::tinygs::station::{StationRecord, station_url};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Issues station requests against a single endpoint base.
#[derive(Debug, Clone)]
pub struct StationFetcher {
    client: Client,
    base_url: String,
}

impl StationFetcher {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::from_client(client, base_url))
    }

    pub fn from_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.api_base_url.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Fetches one station record. Exactly one request is made; there is no retry.
    pub async fn fetch(&self, station: &str) -> Result<StationRecord, FetchError> {
        let url = station_url(&self.base_url, station);
        debug!(url = %url, "fetching station details");
        let resp = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let record: StationRecord = serde_json::from_str(&resp)?;
        debug!(
            station = %record.name,
            confirmed_packets = record.confirmed_packets,
            "fetched station details"
        );
        Ok(record)
    }
}
