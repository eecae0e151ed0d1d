//! Visual Crossing timeline client.

use reqwest::Client;
use skycast_core::{AppError, ConfigError, ReqwestErrorExt, WeatherConfig, WeatherError};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::types::{LocationQuery, WeatherSnapshot};

pub(crate) const USER_AGENT: &str = concat!("SkyCast/", env!("CARGO_PKG_VERSION"));

const TIMELINE_PATH: [&str; 4] = ["VisualCrossingWebServices", "rest", "services", "timeline"];

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    base_url: Url,
    api_key: Option<String>,
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.api_host)
            .map_err(|e| ConfigError::Invalid(format!("weather.api_host: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::Invalid(format!(
                "weather.api_host is not a base URL: {}",
                config.api_host
            ))
            .into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::Network(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            base_url,
            api_key: config.api_key().map(str::to_string),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full timeline URL for `token`. The key is a query parameter.
    pub fn timeline_url(&self, token: &str, api_key: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(TIMELINE_PATH).push(token);
        }
        url.query_pairs_mut()
            .append_pair("unitGroup", "metric")
            .append_pair("key", api_key)
            .append_pair("contentType", "json");
        url
    }

    /// Fetch current conditions and forecast for `query`.
    ///
    /// Issues exactly one request, or none when no key is configured.
    pub async fn fetch(&self, query: &LocationQuery) -> Result<WeatherSnapshot, WeatherError> {
        let api_key = self.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = self.timeline_url(&query.token(), api_key);

        tracing::debug!(location = %query.token(), "Requesting weather timeline");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| WeatherError::Transport(e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                "Weather request rejected: {}",
                body.trim()
            );
            return Err(WeatherError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| WeatherError::Transport(e.into_network_error()))?;

        serde_json::from_str(&body).map_err(|e| WeatherError::Parse(e.to_string()))
    }
}
