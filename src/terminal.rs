//! Plain-text rendering of the display state.

use skycast_weather::{
    BackgroundLayers, DisplayState, NoticeKind, Theme, WeatherCard, WeatherView,
};
use std::fmt::Write as _;

/// Loading messages go to stderr, the card or message to stdout.
#[derive(Debug, Default)]
pub struct TerminalView;

impl WeatherView for TerminalView {
    fn render(&self, state: &DisplayState) {
        if let Some(message) = &state.loading {
            eprintln!("{}", message);
            return;
        }
        if let Some(notice) = &state.notice {
            match notice.kind {
                NoticeKind::Error => println!("Error: {}", notice.message),
                NoticeKind::SearchPrompt => println!("{}", notice.message),
            }
        }
        if let Some(card) = &state.card {
            print!("{}", format_card(card));
        }
    }
}

fn degrees(value: Option<i32>) -> String {
    value
        .map(|v| format!("{}°C", v))
        .unwrap_or_else(|| "--".to_string())
}

/// Names of the active background layers, in drawing order.
fn layer_names(layers: &BackgroundLayers) -> Vec<&'static str> {
    [
        (layers.clouds, "clouds"),
        (layers.rain, "rain"),
        (layers.stars, "stars"),
    ]
    .into_iter()
    .filter_map(|(on, name)| on.then_some(name))
    .collect()
}

pub fn format_card(card: &WeatherCard) -> String {
    let mut out = String::new();
    let theme = match card.theme {
        Theme::Day => "day",
        Theme::Night => "night",
    };
    let mut tags = vec![card.icon.name(), theme];
    tags.extend(layer_names(&card.layers));

    let _ = writeln!(out, "{}", card.city);
    if let Some(time) = &card.local_time {
        let _ = writeln!(out, "{}", time);
    }
    let _ = writeln!(
        out,
        "{}  {}  [{}]",
        degrees(card.temperature),
        card.condition,
        tags.join(", ")
    );
    let _ = writeln!(out);

    let rows = [
        ("Feels like", degrees(card.feels_like)),
        ("Humidity", card.humidity.clone()),
        ("Wind", card.wind.clone()),
        ("UV index", card.uv_index.clone()),
        ("Visibility", card.visibility.clone()),
        ("Sunrise", card.sunrise.clone()),
        ("Sunset", card.sunset.clone()),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "  {:<11}{}", label, value);
    }

    if !card.forecast.is_empty() {
        let _ = writeln!(out);
        for day in &card.forecast {
            let high = day.high.map(|h| h.to_string()).unwrap_or_else(|| "--".into());
            let low = day.low.map(|l| l.to_string()).unwrap_or_else(|| "--".into());
            let _ = writeln!(
                out,
                "  {:<10} {:<8} {:>3}° / {:>3}°  {}",
                day.weekday,
                day.icon.name(),
                high,
                low,
                day.summary
            );
        }
    }

    out
}
