//! City guess from an IANA timezone name.

use chrono_tz::Tz;
use skycast_core::LocationError;

/// Where the timezone name comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimezoneSource {
    /// Read the host's timezone
    System,
    /// Configured name
    Fixed(String),
}

impl TimezoneSource {
    pub fn from_override(name: Option<&str>) -> Self {
        match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Self::Fixed(name.to_string()),
            None => Self::System,
        }
    }

    pub fn current(&self) -> Option<String> {
        match self {
            Self::Fixed(name) => Some(name.clone()),
            Self::System => system_timezone(),
        }
    }
}

/// Host timezone from `TZ`, `/etc/timezone`, or the `/etc/localtime` link.
pub fn system_timezone() -> Option<String> {
    if let Ok(tz) = std::env::var("TZ") {
        let tz = tz.trim_start_matches(':').trim();
        if !tz.is_empty() {
            return Some(tz.to_string());
        }
    }

    if let Ok(contents) = std::fs::read_to_string("/etc/timezone") {
        let tz = contents.trim();
        if !tz.is_empty() {
            return Some(tz.to_string());
        }
    }

    let target = std::fs::read_link("/etc/localtime").ok()?;
    let target = target.to_string_lossy();
    target
        .split_once("zoneinfo/")
        .map(|(_, name)| name.to_string())
}

/// "Africa/Khartoum" -> "Khartoum", "America/Argentina/Buenos_Aires" ->
/// "Buenos Aires".
///
/// Names without a region/city structure ("UTC", "Etc/GMT+3") and names
/// that are not real zones are rejected.
pub fn city_from_timezone(name: &str) -> Result<String, LocationError> {
    let malformed = || LocationError::MalformedTimezone(name.to_string());

    let (region, rest) = name.split_once('/').ok_or_else(malformed)?;
    if region.is_empty() || region == "Etc" || rest.is_empty() {
        return Err(malformed());
    }
    name.parse::<Tz>().map_err(|_| malformed())?;

    let city = rest.rsplit('/').next().unwrap_or(rest).replace('_', " ");
    if city.trim().is_empty() {
        return Err(malformed());
    }
    Ok(city)
}
