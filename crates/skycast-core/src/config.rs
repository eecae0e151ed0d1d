use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `weather.api_key`.
pub const API_KEY_ENV: &str = "SKYCAST_API_KEY";

const DEFAULT_API_HOST: &str = "https://weather.visualcrossing.com";
const DEFAULT_IP_LOOKUP_URL: &str = "https://ip-api.com/json/";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the config file and the last searched city
    #[serde(default = "default_config_dir")]
    pub config_dir: PathBuf,

    /// Weather provider settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Location resolution settings
    #[serde(default)]
    pub location: LocationConfig,
}

fn default_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("skycast")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Visual Crossing API key. `None` means not configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Scheme and host of the timeline API
    #[serde(default = "default_api_host")]
    pub api_host: String,

    /// Timeout for every outbound request
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_host() -> String {
    DEFAULT_API_HOST.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl WeatherConfig {
    /// The configured API key, treating blank strings as missing.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_host: default_api_host(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

/// One step of the location fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSourceKind {
    /// City saved by the last successful search
    LastCity,
    /// Coordinates from the device locator
    Device,
    /// Coordinates from IP geolocation
    Ip,
    /// City guessed from the IANA timezone name
    Timezone,
    /// Let the weather provider infer the location
    Auto,
}

impl LocationSourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LastCity => "last_city",
            Self::Device => "device",
            Self::Ip => "ip",
            Self::Timezone => "timezone",
            Self::Auto => "auto",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Sources tried in order when no city is given
    #[serde(default = "default_sources")]
    pub sources: Vec<LocationSourceKind>,

    /// IP geolocation endpoint
    #[serde(default = "default_ip_lookup_url")]
    pub ip_lookup_url: String,

    /// IANA timezone to use instead of the system one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,

    /// Device geolocation
    #[serde(default)]
    pub device: DeviceLocationConfig,
}

fn default_sources() -> Vec<LocationSourceKind> {
    vec![
        LocationSourceKind::LastCity,
        LocationSourceKind::Device,
        LocationSourceKind::Ip,
        LocationSourceKind::Timezone,
        LocationSourceKind::Auto,
    ]
}

fn default_ip_lookup_url() -> String {
    DEFAULT_IP_LOOKUP_URL.to_string()
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            ip_lookup_url: default_ip_lookup_url(),
            timezone: None,
            device: DeviceLocationConfig::default(),
        }
    }
}

/// Device geolocation settings.
///
/// `enabled` is the user's permission. Coordinates come from the config
/// because there is no portable position API for a terminal program.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceLocationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            weather: WeatherConfig::default(),
            location: LocationConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("Failed to read config file")?;
            toml::from_str::<Config>(&contents).context("Failed to parse config file")?
        } else {
            let config = Self::default();
            config.save_to(path)?;
            tracing::info!("Wrote default config to {}", path.display());
            config
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            config.apply_api_key_override(key);
        }

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Warnings are logged; errors fail the load.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn apply_api_key_override(&mut self, key: String) {
        if !key.trim().is_empty() {
            self.weather.api_key = Some(key);
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.api_host, "weather.api_host", &mut result);

        if self.weather.api_key().is_none() {
            result.add_warning(
                "weather.api_key",
                format!("No API key configured - set {API_KEY_ENV} or weather.api_key"),
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        let sources = &self.location.sources;
        if sources.is_empty() {
            result.add_error("location.sources", "At least one location source is required");
        }
        for (i, source) in sources.iter().enumerate() {
            if sources[..i].contains(source) {
                result.add_warning(
                    "location.sources",
                    format!("Source '{}' is listed more than once", source.name()),
                );
            }
        }

        if sources.contains(&LocationSourceKind::Ip) {
            self.validate_url(
                &self.location.ip_lookup_url,
                "location.ip_lookup_url",
                &mut result,
            );
        }

        let device = &self.location.device;
        if let Some(lat) = device.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                result.add_error("location.device.latitude", "Latitude must be within -90..90");
            }
        }
        if let Some(lon) = device.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                result.add_error(
                    "location.device.longitude",
                    "Longitude must be within -180..180",
                );
            }
        }
        if device.enabled && (device.latitude.is_none() || device.longitude.is_none()) {
            result.add_warning(
                "location.device",
                "Device location is enabled but no coordinates are set",
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the default configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("skycast");

        Ok(config_dir.join("config.toml"))
    }
}
