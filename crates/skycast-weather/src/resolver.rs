//! Location Resolution
//!
//! Walks the configured fallback chain until one source yields a location.
//! Source failures are logged and skipped; only an exhausted chain is an error.

use skycast_core::{AppError, Config, LocationError, LocationSourceKind};
use std::time::Duration;

use crate::geoip::IpLocator;
use crate::location::DeviceLocator;
use crate::store::LastCityStore;
use crate::timezone::{city_from_timezone, TimezoneSource};
use crate::types::{LocationQuery, ResolvedLocation};

pub struct LocationResolver {
    sources: Vec<LocationSourceKind>,
    store: LastCityStore,
    device: DeviceLocator,
    ip: IpLocator,
    timezone: TimezoneSource,
}

impl LocationResolver {
    pub fn new(
        sources: Vec<LocationSourceKind>,
        store: LastCityStore,
        device: DeviceLocator,
        ip: IpLocator,
        timezone: TimezoneSource,
    ) -> Self {
        Self {
            sources,
            store,
            device,
            ip,
            timezone,
        }
    }

    pub fn from_config(config: &Config, store: LastCityStore) -> Result<Self, AppError> {
        let location = &config.location;
        let ip = IpLocator::new(
            location.ip_lookup_url.clone(),
            Duration::from_secs(config.weather.request_timeout_secs),
        )?;

        Ok(Self::new(
            location.sources.clone(),
            store,
            DeviceLocator::from_config(&location.device),
            ip,
            TimezoneSource::from_override(location.timezone.as_deref()),
        ))
    }

    /// Location for an explicit search. Blank input yields `None`.
    pub fn explicit(input: &str) -> Option<ResolvedLocation> {
        LocationQuery::place(input).map(|query| ResolvedLocation {
            query,
            display_name: None,
            source: None,
        })
    }

    /// First location produced by the source chain.
    pub async fn resolve(&self) -> Result<ResolvedLocation, LocationError> {
        for &kind in &self.sources {
            match self.try_source(kind).await {
                Ok(resolved) => {
                    tracing::info!(
                        source = kind.name(),
                        location = %resolved.query.token(),
                        "Resolved location"
                    );
                    return Ok(resolved);
                }
                Err(e) => {
                    tracing::debug!(source = kind.name(), "Location source skipped: {}", e);
                }
            }
        }

        tracing::warn!("All location sources failed");
        Err(LocationError::Exhausted)
    }

    async fn try_source(
        &self,
        kind: LocationSourceKind,
    ) -> Result<ResolvedLocation, LocationError> {
        let (query, display_name) = match kind {
            LocationSourceKind::LastCity => {
                let city = self.store.load().ok_or(LocationError::ServiceUnavailable)?;
                (LocationQuery::Place(city), None)
            }
            LocationSourceKind::Device => {
                let coords = self.device.current_location().await?;
                (coords.into(), None)
            }
            LocationSourceKind::Ip => {
                let found = self.ip.lookup().await?;
                (found.coordinates.into(), found.city)
            }
            LocationSourceKind::Timezone => {
                let name = self
                    .timezone
                    .current()
                    .ok_or(LocationError::ServiceUnavailable)?;
                (LocationQuery::Place(city_from_timezone(&name)?), None)
            }
            LocationSourceKind::Auto => (LocationQuery::Auto, None),
        };

        Ok(ResolvedLocation {
            query,
            display_name,
            source: Some(kind),
        })
    }
}
