//! Shared helpers for the integration tests.

#![allow(dead_code)]

use parking_lot::Mutex;
use skycast_core::{Config, DeviceLocationConfig, LocationConfig, LocationSourceKind, WeatherConfig};
use skycast_weather::{DisplayState, WeatherView};
use std::path::Path;

pub const API_KEY: &str = "test-key";
pub const TIMELINE: &str = "/VisualCrossingWebServices/rest/services/timeline";

/// View double that records every rendered state.
#[derive(Default)]
pub struct RecordingView {
    states: Mutex<Vec<DisplayState>>,
}

impl RecordingView {
    pub fn states(&self) -> Vec<DisplayState> {
        self.states.lock().clone()
    }

    pub fn last(&self) -> DisplayState {
        self.states.lock().last().cloned().unwrap_or_default()
    }
}

impl WeatherView for RecordingView {
    fn render(&self, state: &DisplayState) {
        self.states.lock().push(state.clone());
    }
}

pub fn timeline_path(token: &str) -> String {
    format!("{}/{}", TIMELINE, token)
}

/// Timeline body with `days` daily entries starting on Monday 2026-10-12.
pub fn timeline_json(address: &str, icon: &str, days: usize) -> serde_json::Value {
    let days: Vec<serde_json::Value> = (0..days)
        .map(|i| {
            serde_json::json!({
                "datetime": format!("2026-10-{:02}", 12 + i),
                "datetimeEpoch": 1_791_756_000 + (i as i64) * 86_400,
                "tempmax": 24.6,
                "tempmin": 13.2,
                "icon": "partly-cloudy-day",
                "conditions": "Partially cloudy"
            })
        })
        .collect();

    serde_json::json!({
        "resolvedAddress": address,
        "address": address.to_lowercase(),
        "timezone": "Europe/London",
        "currentConditions": {
            "datetimeEpoch": 1_791_800_000,
            "temp": 17.5,
            "feelslike": 16.4,
            "humidity": 72.3,
            "windspeed": 19.1,
            "uvindex": 3.0,
            "visibility": 9.8,
            "sunrise": "07:21:05",
            "sunset": "18:04:51",
            "sunriseEpoch": 1_791_786_065,
            "sunsetEpoch": 1_791_825_891,
            "icon": icon,
            "conditions": "Rain, Partially cloudy"
        },
        "days": days
    })
}

pub fn test_config(
    dir: &Path,
    api_host: &str,
    ip_lookup_url: &str,
    sources: Vec<LocationSourceKind>,
    timezone: Option<&str>,
) -> Config {
    Config {
        config_dir: dir.to_path_buf(),
        weather: WeatherConfig {
            api_key: Some(API_KEY.to_string()),
            api_host: api_host.to_string(),
            request_timeout_secs: 5,
        },
        location: LocationConfig {
            sources,
            ip_lookup_url: ip_lookup_url.to_string(),
            timezone: timezone.map(str::to_string),
            device: DeviceLocationConfig::default(),
        },
    }
}
