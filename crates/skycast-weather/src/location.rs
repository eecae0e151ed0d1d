//! Device geolocation.
//!
//! A terminal program has no portable position API, so the device position is
//! whatever the user configured, gated by the `enabled` permission flag.

use skycast_core::{DeviceLocationConfig, LocationError};

use crate::types::Coordinates;

#[derive(Debug, Clone, PartialEq)]
pub enum DeviceLocator {
    /// The user has not allowed device location
    Denied,
    /// Allowed, but no position is known
    Unavailable,
    /// A fixed position
    Fixed(Coordinates),
}

impl DeviceLocator {
    pub fn from_config(config: &DeviceLocationConfig) -> Self {
        if !config.enabled {
            return Self::Denied;
        }
        match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Self::Fixed(Coordinates {
                latitude,
                longitude,
            }),
            _ => Self::Unavailable,
        }
    }

    pub async fn current_location(&self) -> Result<Coordinates, LocationError> {
        match self {
            Self::Denied => Err(LocationError::PermissionDenied),
            Self::Unavailable => Err(LocationError::ServiceUnavailable),
            Self::Fixed(coords) => Ok(*coords),
        }
    }
}
