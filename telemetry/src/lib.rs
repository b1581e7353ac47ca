pub mod tinygs;

use crate::error::ConfigError;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub const ENV_VAR_PREFIX: &str = "TINYGS_PANEL_";
pub const SETTINGS_FILE: &str = "Settings.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Station identifier in the `name@userId` form used by the station endpoint.
    pub station: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            station: "ROXX_LoRa@731332067".to_string(),
            api_base_url: tinygs::station::STATION_ENDPOINT.to_string(),
            request_timeout_secs: 10,
        }
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    Ok(Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(SETTINGS_FILE))
        .merge(Env::prefixed(ENV_VAR_PREFIX).split("__"))
        .extract::<Config>()?)
}

pub async fn shutdown_listener(token: Option<CancellationToken>) {
    let ctrl_c = signal::ctrl_c();
    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = ?e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!(name: "signal.ctrlc.received", "received Ctrl+C signal, shutting down"),
        _ = terminate => info!(name: "signal.sigterm.received", "received SIGTERM signal, shutting down"),
    }

    if let Some(token) = token {
        token.cancel();
    }
}

pub mod error {
    use thiserror::Error;
    use tracing::dispatcher::SetGlobalDefaultError;

    /// Message shown to the operator for any failure of the fetch/normalize pipeline.
    pub const LOAD_FAILED_MESSAGE: &str = "failed to load station details";

    #[derive(Debug, Error)]
    pub enum ConfigError {
        #[error("failed to load configuration: {0}")]
        Figment(#[from] figment::Error),
    }

    #[derive(Debug, Error)]
    pub enum InitializationError {
        #[error(transparent)]
        Tracing(#[from] SetGlobalDefaultError),
        #[error(transparent)]
        Config(#[from] ConfigError),
        #[error("failed to build HTTP client: {0}")]
        HttpClient(#[from] reqwest::Error),
    }

    /// Any failure between issuing the request and holding a decoded station record.
    /// The variants exist for diagnostics only; callers treat them identically.
    #[derive(Debug, Error)]
    pub enum FetchError {
        #[error("fetch failed: {0}")]
        Reqwest(#[from] reqwest::Error),
        #[error("fetch failed: {0}")]
        Deserialize(#[from] serde_json::Error),
    }

    #[derive(Debug, Error)]
    pub enum NormalizeError {
        #[error("malformed configuration: {0}")]
        MalformedConfiguration(#[source] serde_json::Error),
    }

    #[derive(Debug, Error)]
    pub enum PipelineError {
        #[error(transparent)]
        Fetch(#[from] FetchError),
        #[error(transparent)]
        Normalize(#[from] NormalizeError),
    }

    impl PipelineError {
        pub fn user_message(&self) -> &'static str {
            LOAD_FAILED_MESSAGE
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn both_stages_collapse_to_one_message() {
            let decode = serde_json::from_str::<serde_json::Value>("{bad json").unwrap_err();
            let normalize = PipelineError::from(NormalizeError::MalformedConfiguration(decode));
            let decode = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
            let fetch = PipelineError::from(FetchError::from(decode));

            assert_eq!(normalize.user_message(), fetch.user_message());
            assert_eq!(fetch.user_message(), "failed to load station details");
            assert!(normalize.to_string().starts_with("malformed configuration"));
            assert!(fetch.to_string().starts_with("fetch failed"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_public_station_endpoint() {
        let config = Config::default();
        assert_eq!(config.api_base_url, "https://api.tinygs.com/v1/station/");
        assert_eq!(config.request_timeout_secs, 10);
        assert!(config.station.contains('@'));
    }

    #[test]
    fn env_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("TINYGS_PANEL_STATION", "OTHER_Station@42");
            jail.set_env("TINYGS_PANEL_REQUEST_TIMEOUT_SECS", "3");
            let config = load_config().map_err(|e| e.to_string())?;
            assert_eq!(config.station, "OTHER_Station@42");
            assert_eq!(config.request_timeout_secs, 3);
            assert_eq!(config.api_base_url, Config::default().api_base_url);
            Ok(())
        });
    }

    #[test]
    fn settings_file_is_layered_under_env() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                SETTINGS_FILE,
                r#"
                station = "FILE_Station@1"
                api_base_url = "http://localhost:8080/v1/station"
                "#,
            )?;
            jail.set_env("TINYGS_PANEL_STATION", "ENV_Station@2");
            let config = load_config().map_err(|e| e.to_string())?;
            assert_eq!(config.station, "ENV_Station@2");
            assert_eq!(config.api_base_url, "http://localhost:8080/v1/station");
            Ok(())
        });
    }
}
