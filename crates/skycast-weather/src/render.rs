//! Mapping from a provider snapshot to the formatted card.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::types::{
    BackgroundLayers, ConditionIcon, CurrentConditions, DayConditions, ForecastEntry, Theme,
    WeatherCard, WeatherSnapshot,
};

/// Number of days shown after today.
pub const FORECAST_DAYS: usize = 5;

const MISSING: &str = "--";

/// Build the card for `snapshot`. `display_name` overrides the provider's
/// resolved address.
pub fn build_card(snapshot: &WeatherSnapshot, display_name: Option<&str>) -> WeatherCard {
    let current = &snapshot.current_conditions;
    let tz = snapshot.timezone.as_deref().and_then(parse_tz);
    let theme = theme_for(current);
    let code = current.icon.as_deref().unwrap_or_default();

    let city = display_name
        .filter(|n| !n.trim().is_empty())
        .or(snapshot.place_name())
        .unwrap_or(MISSING)
        .to_string();

    WeatherCard {
        city,
        local_time: current
            .datetime_epoch
            .and_then(|epoch| format_epoch(epoch, tz, "%A, %-d %B %H:%M")),
        temperature: current.temp.map(round_temp),
        feels_like: current.feelslike.map(round_temp),
        humidity: current
            .humidity
            .map(|h| format!("{:.0}%", h))
            .unwrap_or_else(|| MISSING.to_string()),
        wind: with_unit(current.windspeed, "km/h"),
        uv_index: current
            .uvindex
            .map(|uv| uv.to_string())
            .unwrap_or_else(|| MISSING.to_string()),
        visibility: with_unit(current.visibility, "km"),
        sunrise: clock_time(current.sunrise.as_deref(), current.sunrise_epoch, tz),
        sunset: clock_time(current.sunset.as_deref(), current.sunset_epoch, tz),
        condition: current.conditions.clone().unwrap_or_default(),
        icon: ConditionIcon::resolve(current.icon.as_deref(), current.conditions.as_deref()),
        theme,
        layers: layers_for(code, theme),
        forecast: forecast_entries(&snapshot.days, tz),
    }
}

/// Temperatures are always shown as whole degrees.
pub fn round_temp(value: f64) -> i32 {
    value.round() as i32
}

fn with_unit(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", v, unit),
        None => MISSING.to_string(),
    }
}

/// Clip "HH:MM:SS" to "HH:MM".
pub fn clip_hour_minute(time: &str) -> &str {
    match time.get(..5) {
        Some(clipped) if clipped.as_bytes()[2] == b':' => clipped,
        _ => time,
    }
}

fn clock_time(text: Option<&str>, epoch: Option<i64>, tz: Option<Tz>) -> String {
    if let Some(text) = text.filter(|t| !t.is_empty()) {
        return clip_hour_minute(text).to_string();
    }
    epoch
        .and_then(|e| format_epoch(e, tz, "%H:%M"))
        .unwrap_or_else(|| MISSING.to_string())
}

fn parse_tz(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

fn format_epoch(epoch: i64, tz: Option<Tz>, fmt: &str) -> Option<String> {
    let utc = DateTime::<Utc>::from_timestamp(epoch, 0)?;
    Some(match tz {
        Some(tz) => utc.with_timezone(&tz).format(fmt).to_string(),
        None => utc.format(fmt).to_string(),
    })
}

/// Day or night for the current observation.
///
/// The icon code's `-day`/`-night` suffix wins. Otherwise the observation
/// time is compared against sunrise and sunset, and as a last resort a UV
/// index below 1 means night.
pub fn theme_for(current: &CurrentConditions) -> Theme {
    if let Some(code) = current.icon.as_deref() {
        if code.ends_with("-night") {
            return Theme::Night;
        }
        if code.ends_with("-day") {
            return Theme::Day;
        }
    }

    if let (Some(now), Some(rise), Some(set)) = (
        current.datetime_epoch,
        current.sunrise_epoch,
        current.sunset_epoch,
    ) {
        return if now < rise || now >= set {
            Theme::Night
        } else {
            Theme::Day
        };
    }

    match current.uvindex {
        Some(uv) if uv < 1.0 => Theme::Night,
        _ => Theme::Day,
    }
}

/// Background layers for a condition code.
///
/// Rain comes from "rain" or "showers" codes; clouds only from "cloudy" ones.
pub fn layers_for(code: &str, theme: Theme) -> BackgroundLayers {
    let code = code.to_lowercase();
    BackgroundLayers {
        clouds: code.contains("cloudy"),
        rain: code.contains("rain") || code.contains("showers"),
        stars: theme == Theme::Night,
    }
}

/// Forecast rows for the days after today, at most `FORECAST_DAYS`.
pub fn forecast_entries(days: &[DayConditions], tz: Option<Tz>) -> Vec<ForecastEntry> {
    days.iter()
        .skip(1)
        .take(FORECAST_DAYS)
        .map(|day| ForecastEntry {
            weekday: weekday_name(day, tz),
            icon: ConditionIcon::resolve(day.icon.as_deref(), day.conditions.as_deref()),
            high: day.tempmax.map(round_temp),
            low: day.tempmin.map(round_temp),
            summary: day.conditions.clone().unwrap_or_default(),
        })
        .collect()
}

fn weekday_name(day: &DayConditions, tz: Option<Tz>) -> String {
    if let Some(date) = day
        .datetime
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    {
        return date.format("%A").to_string();
    }
    day.datetime_epoch
        .and_then(|e| format_epoch(e, tz, "%A"))
        .unwrap_or_else(|| MISSING.to_string())
}
