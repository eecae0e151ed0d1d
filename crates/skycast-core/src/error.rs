//! Centralized error types for SkyCast.
//!
//! Every failure the user can see maps to one of four classes:
//! - configuration (missing credential, bad settings)
//! - request rejected by the weather provider
//! - transport failure (no response at all)
//! - location source failure, which is only surfaced when every source failed

use thiserror::Error;

/// Longest slice of a provider diagnostic body forwarded to the user.
const MAX_PROVIDER_TEXT: usize = 200;

/// Top-level application error type.
///
/// Use `user_message()` to get a message suitable for display.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather service error: {0}")]
    Weather(#[from] WeatherError),

    #[error("Location error: {0}")]
    Location(#[from] LocationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(e) => e.user_message().to_string(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Weather(e) => e.user_message(),
            AppError::Location(e) => e.user_message().to_string(),
            AppError::Io(_) => "A file operation failed. Please try again.".to_string(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::InvalidResponse(_) => {
                "Received an unexpected response. Please try again."
            }
            NetworkError::RequestFailed(_) => {
                "Network error. Check your connection and try again."
            }
        }
    }

    /// Whether the request never reached the server.
    ///
    /// Content blockers and offline machines both surface this way.
    pub fn is_connection_failure(&self) -> bool {
        matches!(self, NetworkError::ConnectionFailed(_))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Weather service errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No API key is configured.
    #[error("Weather API key is not configured")]
    MissingApiKey,

    /// The provider answered with a non-success status.
    #[error("Weather request rejected ({status}): {body}")]
    Rejected { status: u16, body: String },

    /// No response was received.
    #[error("Weather request failed: {0}")]
    Transport(#[from] NetworkError),

    /// The response body did not have the expected shape.
    #[error("Failed to parse weather response: {0}")]
    Parse(String),
}

impl WeatherError {
    /// Message shown in the error panel.
    ///
    /// Rejections forward the provider's diagnostic text so that problems like
    /// a bad key can be told apart from an unknown place.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::MissingApiKey => {
                "Weather API key is missing. Set SKYCAST_API_KEY or add api_key to your config."
                    .to_string()
            }
            WeatherError::Rejected { body, .. } => {
                let text = provider_text(body);
                if text.is_empty() {
                    "Location not found. Check the spelling and try again.".to_string()
                } else {
                    format!("Could not load weather: {text}")
                }
            }
            WeatherError::Transport(e) => e.user_message().to_string(),
            WeatherError::Parse(_) => {
                "Weather service sent an unexpected response. Please try again.".to_string()
            }
        }
    }
}

fn provider_text(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_PROVIDER_TEXT) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

/// Location source errors.
///
/// These drive fall-through in the resolver and only reach the user as
/// `Exhausted`.
#[derive(Debug, Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location service unavailable")]
    ServiceUnavailable,

    #[error("Location lookup failed: {0}")]
    LookupFailed(String),

    #[error("Timezone has no city component: {0}")]
    MalformedTimezone(String),

    #[error("No location source produced a location")]
    Exhausted,
}

impl LocationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationError::Exhausted => {
                "Couldn't determine your location. Search for a city instead."
            }
            _ => "Location lookup failed. Search for a city instead.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if self.is_decode() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::RequestFailed(self.to_string())
        }
    }
}
