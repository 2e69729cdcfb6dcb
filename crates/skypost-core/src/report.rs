//! Post text for each report kind.

use chrono_tz::Tz;
use skypost_weather::{normalize, ObservationSnapshot, WeatherError};
use std::fmt;

use crate::error::AppError;

/// Which report a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Weather,
    Aqi,
    Sunset,
}

impl ReportKind {
    /// Whether the report needs the pollution endpoint as well as current weather
    pub fn needs_pollution(self) -> bool {
        matches!(self, Self::Aqi)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Aqi => "aqi",
            Self::Sunset => "sunset",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render the post text for `kind`.
pub fn render(
    kind: ReportKind,
    snapshot: &ObservationSnapshot,
    place: &str,
    tz: Tz,
) -> Result<String, AppError> {
    match kind {
        ReportKind::Weather => Ok(weather_text(snapshot, place)),
        ReportKind::Aqi => aqi_text(snapshot, place),
        ReportKind::Sunset => sunset_text(snapshot, place, tz),
    }
}

fn weather_text(snapshot: &ObservationSnapshot, place: &str) -> String {
    let mut text = format!(
        "Weather update for {}: {:.1}°C, {}.",
        place,
        snapshot.temperature,
        title_case(&snapshot.condition)
    );

    if let Some(feels_like) = snapshot.feels_like {
        text.push_str(&format!(" Feels like {:.1}°C.", feels_like));
    }

    text.push_str(&format!(" Humidity {}%.", snapshot.humidity));
    text
}

fn aqi_text(snapshot: &ObservationSnapshot, place: &str) -> Result<String, AppError> {
    let Some(pm25) = snapshot.pm25 else {
        tracing::warn!("No PM2.5 reading, posting AQI as unavailable");
        let mut text = format!("Air quality in {}: AQI unavailable.", place);
        if let Some(level) = snapshot.provider_aqi {
            text.push_str(&format!(" Provider level: {}.", level.description()));
        }
        return Ok(text);
    };

    let aqi = normalize(pm25)?;
    let mut text = format!(
        "Air quality in {}: AQI {} ({}), PM2.5 {:.1} µg/m³.",
        place,
        aqi.index,
        aqi.label.description(),
        pm25
    );

    if !aqi.advisory.is_empty() {
        text.push_str(&format!(" Advisory: {}.", aqi.advisory));
    }
    Ok(text)
}

fn sunset_text(snapshot: &ObservationSnapshot, place: &str, tz: Tz) -> Result<String, AppError> {
    let sun = snapshot
        .sun
        .ok_or(AppError::DataUnavailable(WeatherError::MissingField("sys.sunset")))?;

    Ok(format!(
        "Sunset in {} today at {} ({}). Sunrise was at {}.",
        place,
        sun.sunset.with_timezone(&tz).format("%H:%M"),
        tz.name(),
        sun.sunrise.with_timezone(&tz).format("%H:%M"),
    ))
}

/// "scattered clouds" -> "Scattered Clouds"
fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
