pub mod config;
pub mod error;

pub use config::{
    Config, DeviceLocationConfig, LocationConfig, LocationSourceKind, ValidationResult,
    WeatherConfig,
};
pub use error::{
    AppError, ConfigError, LocationError, NetworkError, ReqwestErrorExt, WeatherError,
};

use anyhow::Result;

/// Initialize logging for the application.
///
/// Output goes to stderr so stdout is left for the rendered weather card.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("SkyCast core initialized");
    Ok(())
}
