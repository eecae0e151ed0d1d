use serde::{Deserialize, Deserializer, Serialize};
use skycast_core::LocationSourceKind;
use std::fmt;

/// Token sent to the weather provider to pick a location.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text place name, e.g. "Khartoum" or "New York"
    Place(String),
    /// Coordinates in decimal degrees
    Coordinates { latitude: f64, longitude: f64 },
    /// Let the provider infer the location from the request
    Auto,
}

impl LocationQuery {
    /// Build a place query from user input. Blank input yields `None`.
    pub fn place(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self::Place(trimmed.to_string()))
        }
    }

    /// The string placed in the request path.
    pub fn token(&self) -> String {
        match self {
            Self::Place(name) => name.clone(),
            Self::Coordinates {
                latitude,
                longitude,
            } => format!("{},{}", latitude, longitude),
            Self::Auto => "auto".to_string(),
        }
    }
}

impl fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "your location"),
            other => write!(f, "{}", other.token()),
        }
    }
}

/// Latitude/longitude pair from a locator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Coordinates> for LocationQuery {
    fn from(c: Coordinates) -> Self {
        LocationQuery::Coordinates {
            latitude: c.latitude,
            longitude: c.longitude,
        }
    }
}

/// Output of the location resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub query: LocationQuery,
    /// Name to show instead of the provider's resolved address
    pub display_name: Option<String>,
    /// Which source produced this location; `None` for explicit searches
    pub source: Option<LocationSourceKind>,
}

/// Timeline API response, reduced to the fields that are displayed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub resolved_address: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    /// IANA timezone of the location
    #[serde(default)]
    pub timezone: Option<String>,
    pub current_conditions: CurrentConditions,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub days: Vec<DayConditions>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl WeatherSnapshot {
    /// Provider's canonical place name, falling back to the echoed query.
    pub fn place_name(&self) -> Option<&str> {
        non_empty(&self.resolved_address).or_else(|| non_empty(&self.address))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

/// `currentConditions` block. Any field may be null for sparse stations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CurrentConditions {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub feelslike: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub windspeed: Option<f64>,
    #[serde(default)]
    pub uvindex: Option<f64>,
    #[serde(default)]
    pub visibility: Option<f64>,
    /// Local time string, e.g. "06:12:33"
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
    #[serde(default, rename = "sunriseEpoch")]
    pub sunrise_epoch: Option<i64>,
    #[serde(default, rename = "sunsetEpoch")]
    pub sunset_epoch: Option<i64>,
    #[serde(default, rename = "datetimeEpoch")]
    pub datetime_epoch: Option<i64>,
    /// Condition code, e.g. "partly-cloudy-day"
    #[serde(default)]
    pub icon: Option<String>,
    /// Human text, e.g. "Partially cloudy"
    #[serde(default)]
    pub conditions: Option<String>,
}

/// One entry of `days`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DayConditions {
    /// Local date, "YYYY-MM-DD"
    #[serde(default)]
    pub datetime: Option<String>,
    #[serde(default, rename = "datetimeEpoch")]
    pub datetime_epoch: Option<i64>,
    #[serde(default)]
    pub tempmax: Option<f64>,
    #[serde(default)]
    pub tempmin: Option<f64>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub conditions: Option<String>,
}

/// Local icon asset for a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionIcon {
    #[default]
    Clear,
    Clouds,
    Rain,
    Drizzle,
    Mist,
    Snow,
}

impl ConditionIcon {
    /// Exact lookup on the provider's icon code. Unknown codes are clear.
    pub fn from_code(code: &str) -> Self {
        match code {
            "clear-day" | "clear-night" => Self::Clear,
            "partly-cloudy-day" | "partly-cloudy-night" | "cloudy" | "wind" => Self::Clouds,
            "rain" | "thunder-rain" | "thunder-showers-day" | "thunder-showers-night" => {
                Self::Rain
            }
            "showers-day" | "showers-night" => Self::Drizzle,
            "fog" => Self::Mist,
            "snow" | "snow-showers-day" | "snow-showers-night" => Self::Snow,
            _ => Self::Clear,
        }
    }

    /// Keyword match on the condition text, used when no icon code is sent.
    pub fn from_conditions_text(text: &str) -> Self {
        let text = text.to_lowercase();
        if text.contains("cloud") || text.contains("overcast") {
            Self::Clouds
        } else if text.contains("drizzle") {
            Self::Drizzle
        } else if text.contains("rain") {
            Self::Rain
        } else if text.contains("snow") {
            Self::Snow
        } else if text.contains("mist") || text.contains("fog") {
            Self::Mist
        } else {
            Self::Clear
        }
    }

    /// Icon for an icon code and/or condition text.
    pub fn resolve(code: Option<&str>, conditions: Option<&str>) -> Self {
        match (code.filter(|c| !c.is_empty()), conditions) {
            (Some(code), _) => Self::from_code(code),
            (None, Some(text)) => Self::from_conditions_text(text),
            (None, None) => Self::Clear,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Clouds => "clouds",
            Self::Rain => "rain",
            Self::Drizzle => "drizzle",
            Self::Mist => "mist",
            Self::Snow => "snow",
        }
    }

    pub fn asset_path(&self) -> String {
        format!("images/{}.png", self.name())
    }
}

/// Card background theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Day,
    Night,
}

/// Decorative layers drawn behind the card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct BackgroundLayers {
    pub clouds: bool,
    pub rain: bool,
    pub stars: bool,
}

/// One row of the forecast list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub weekday: String,
    pub icon: ConditionIcon,
    pub high: Option<i32>,
    pub low: Option<i32>,
    pub summary: String,
}

/// Everything the weather panel shows, already formatted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherCard {
    pub city: String,
    pub local_time: Option<String>,
    pub temperature: Option<i32>,
    pub feels_like: Option<i32>,
    pub humidity: String,
    pub wind: String,
    pub uv_index: String,
    pub visibility: String,
    pub sunrise: String,
    pub sunset: String,
    pub condition: String,
    pub icon: ConditionIcon,
    pub theme: Theme,
    pub layers: BackgroundLayers,
    pub forecast: Vec<ForecastEntry>,
}

/// Severity of the message panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Error,
    /// Soft prompt inviting a manual search
    SearchPrompt,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn search_prompt(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::SearchPrompt,
            message: message.into(),
        }
    }
}

/// What the view should currently show.
///
/// The weather panel is visible iff `card` is set; the message panel iff
/// `notice` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    pub loading: Option<String>,
    pub notice: Option<Notice>,
    pub card: Option<WeatherCard>,
}

impl DisplayState {
    pub fn is_loading(&self) -> bool {
        self.loading.is_some()
    }

    pub fn weather_visible(&self) -> bool {
        self.card.is_some()
    }

    pub fn error_visible(&self) -> bool {
        self.notice.is_some()
    }

    pub fn theme(&self) -> Theme {
        self.card.as_ref().map(|c| c.theme).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_query_trims_and_rejects_blank() {
        assert_eq!(
            LocationQuery::place("  Khartoum "),
            Some(LocationQuery::Place("Khartoum".to_string()))
        );
        assert_eq!(LocationQuery::place("   "), None);
    }

    #[test]
    fn test_query_tokens() {
        assert_eq!(LocationQuery::Auto.token(), "auto");
        let coords = LocationQuery::Coordinates {
            latitude: 15.5,
            longitude: 32.5,
        };
        assert_eq!(coords.token(), "15.5,32.5");
    }

    #[test]
    fn test_icon_exact_lookup() {
        assert_eq!(ConditionIcon::from_code("partly-cloudy-night"), ConditionIcon::Clouds);
        assert_eq!(ConditionIcon::from_code("thunder-rain"), ConditionIcon::Rain);
        assert_eq!(ConditionIcon::from_code("showers-day"), ConditionIcon::Drizzle);
        assert_eq!(ConditionIcon::from_code("fog"), ConditionIcon::Mist);
        assert_eq!(ConditionIcon::from_code("snow-showers-day"), ConditionIcon::Snow);
    }

    #[test]
    fn test_unknown_icon_defaults_to_clear() {
        assert_eq!(ConditionIcon::from_code("hail"), ConditionIcon::Clear);
        assert_eq!(ConditionIcon::from_code(""), ConditionIcon::Clear);
    }

    #[test]
    fn test_icon_falls_back_to_conditions_text() {
        assert_eq!(
            ConditionIcon::resolve(None, Some("Rain, Partially cloudy")),
            ConditionIcon::Clouds
        );
        assert_eq!(ConditionIcon::resolve(Some(""), Some("Light Drizzle")), ConditionIcon::Drizzle);
        assert_eq!(ConditionIcon::resolve(None, None), ConditionIcon::Clear);
    }

    #[test]
    fn test_icon_asset_path() {
        assert_eq!(ConditionIcon::Mist.asset_path(), "images/mist.png");
    }

    #[test]
    fn test_snapshot_tolerates_missing_days() {
        let json = r#"{
            "resolvedAddress": "Khartoum, Sudan",
            "currentConditions": {"temp": 38.6, "icon": "clear-day"}
        }"#;
        let snapshot: WeatherSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.days.is_empty());
        assert_eq!(snapshot.place_name(), Some("Khartoum, Sudan"));
        assert_eq!(snapshot.current_conditions.temp, Some(38.6));
    }

    #[test]
    fn test_snapshot_accepts_null_fields() {
        let json = r#"{
            "address": "london",
            "currentConditions": {"temp": 12.0, "uvindex": null, "sunriseEpoch": 1700000000}
        }"#;
        let snapshot: WeatherSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.place_name(), Some("london"));
        assert_eq!(snapshot.current_conditions.uvindex, None);
        assert_eq!(snapshot.current_conditions.sunrise_epoch, Some(1_700_000_000));
    }

    #[test]
    fn test_snapshot_null_days_is_empty() {
        let json = r#"{
            "resolvedAddress": "Oslo, Norway",
            "currentConditions": {"temp": 4.2},
            "days": null
        }"#;
        let snapshot: WeatherSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.days.is_empty());
    }

    #[test]
    fn test_place_name_skips_empty_resolved_address() {
        let json = r#"{
            "resolvedAddress": "",
            "address": "oslo",
            "currentConditions": {}
        }"#;
        let snapshot: WeatherSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.place_name(), Some("oslo"));
    }
}
