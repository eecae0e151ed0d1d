//! IP geolocation via ip-api.com - free, no API key required.

use reqwest::Client;
use serde::Deserialize;
use skycast_core::{LocationError, ReqwestErrorExt};
use std::sync::Arc;
use std::time::Duration;

use crate::provider::USER_AGENT;
use crate::types::Coordinates;

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
}

/// Position reported for the caller's public IP.
#[derive(Debug, Clone, PartialEq)]
pub struct IpLocation {
    pub coordinates: Coordinates,
    pub city: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IpLocator {
    client: Arc<Client>,
    url: String,
}

impl IpLocator {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LocationError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LocationError::LookupFailed(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
            url: url.into(),
        })
    }

    /// Look up the caller's approximate position.
    pub async fn lookup(&self) -> Result<IpLocation, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| LocationError::LookupFailed(e.into_network_error().to_string()))?;

        if !response.status().is_success() {
            return Err(LocationError::LookupFailed(format!(
                "IP lookup returned status {}",
                response.status()
            )));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::LookupFailed(format!("IP lookup parse error: {}", e)))?;

        if body.status != "success" {
            return Err(LocationError::LookupFailed(
                body.message
                    .unwrap_or_else(|| format!("IP lookup status '{}'", body.status)),
            ));
        }

        let (latitude, longitude) = match (body.lat, body.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(LocationError::LookupFailed(
                    "IP lookup response has no coordinates".to_string(),
                ))
            }
        };

        let city = body.city.filter(|c| !c.trim().is_empty());
        tracing::info!(
            lat = latitude,
            lon = longitude,
            city = city.as_deref().unwrap_or("unknown"),
            "IP geolocation succeeded"
        );

        Ok(IpLocation {
            coordinates: Coordinates {
                latitude,
                longitude,
            },
            city,
        })
    }
}
