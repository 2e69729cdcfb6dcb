use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Sunrise and sunset for the day of the observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

/// Air quality level on the provider's own 1-5 scale.
///
/// Only used as a fallback when no PM2.5 concentration is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderAqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
}

impl ProviderAqiLevel {
    /// Convert the provider's numeric level (1 = best, 5 = worst)
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Good),
            2 => Some(Self::Fair),
            3 => Some(Self::Moderate),
            4 => Some(Self::Poor),
            5 => Some(Self::VeryPoor),
            _ => None,
        }
    }

    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

/// Current conditions extracted from the weather endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReading {
    /// Place name the provider resolved the query to
    pub location: Option<String>,
    pub coordinates: Coordinates,
    /// Degrees Celsius
    pub temperature: f64,
    pub feels_like: Option<f64>,
    /// Relative humidity, 0-100
    pub humidity: u8,
    pub condition: String,
    pub sun: Option<SunTimes>,
}

/// Pollutant readings extracted from the air pollution endpoint.
/// Every field is optional; missing data degrades the report instead of failing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollutionReading {
    /// PM2.5 concentration in µg/m³
    pub pm25: Option<f64>,
    pub level: Option<ProviderAqiLevel>,
}

/// Everything one invocation knows about the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationSnapshot {
    pub location: Option<String>,
    pub coordinates: Coordinates,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: u8,
    pub condition: String,
    pub pm25: Option<f64>,
    pub provider_aqi: Option<ProviderAqiLevel>,
    pub sun: Option<SunTimes>,
}

impl ObservationSnapshot {
    /// Combine a weather reading with an optional pollution reading.
    pub fn new(weather: WeatherReading, pollution: Option<PollutionReading>) -> Self {
        let pollution = pollution.unwrap_or_default();
        Self {
            location: weather.location,
            coordinates: weather.coordinates,
            temperature: weather.temperature,
            feels_like: weather.feels_like,
            humidity: weather.humidity,
            condition: weather.condition,
            pm25: pollution.pm25,
            provider_aqi: pollution.level,
            sun: weather.sun,
        }
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Missing field in provider response: {0}")]
    MissingField(&'static str),
    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl WeatherError {
    pub fn user_message(&self) -> &'static str {
        match self {
            WeatherError::Network(_) => "Unable to reach the weather service. Check your connection.",
            WeatherError::Status { status, .. } if *status == 401 => {
                "Weather API key was rejected. Check OPENWEATHER_API_KEY."
            }
            WeatherError::Status { status, .. } if *status == 404 => {
                "Location not found by the weather service."
            }
            WeatherError::Status { .. } => "Weather service returned an error.",
            WeatherError::Parse(_) | WeatherError::MissingField(_) => {
                "Weather service sent an unexpected response."
            }
            WeatherError::InvalidUrl(_) => "Weather service URL is invalid. Check settings.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> WeatherReading {
        WeatherReading {
            location: Some("Nagpur".to_string()),
            coordinates: Coordinates {
                latitude: 21.15,
                longitude: 79.09,
            },
            temperature: 31.5,
            feels_like: Some(33.0),
            humidity: 40,
            condition: "scattered clouds".to_string(),
            sun: None,
        }
    }

    #[test]
    fn test_provider_level_mapping() {
        assert_eq!(ProviderAqiLevel::from_level(1), Some(ProviderAqiLevel::Good));
        assert_eq!(ProviderAqiLevel::from_level(2), Some(ProviderAqiLevel::Fair));
        assert_eq!(ProviderAqiLevel::from_level(5), Some(ProviderAqiLevel::VeryPoor));
    }

    #[test]
    fn test_provider_level_out_of_range() {
        assert_eq!(ProviderAqiLevel::from_level(0), None);
        assert_eq!(ProviderAqiLevel::from_level(6), None);
    }

    #[test]
    fn test_provider_level_description() {
        assert_eq!(ProviderAqiLevel::VeryPoor.description(), "Very Poor");
        assert_eq!(ProviderAqiLevel::Fair.description(), "Fair");
    }

    #[test]
    fn test_snapshot_without_pollution() {
        let snapshot = ObservationSnapshot::new(reading(), None);
        assert_eq!(snapshot.temperature, 31.5);
        assert_eq!(snapshot.humidity, 40);
        assert!(snapshot.pm25.is_none());
        assert!(snapshot.provider_aqi.is_none());
    }

    #[test]
    fn test_snapshot_with_pollution() {
        let pollution = PollutionReading {
            pm25: Some(35.4),
            level: Some(ProviderAqiLevel::Moderate),
        };
        let snapshot = ObservationSnapshot::new(reading(), Some(pollution));
        assert_eq!(snapshot.pm25, Some(35.4));
        assert_eq!(snapshot.provider_aqi, Some(ProviderAqiLevel::Moderate));
        assert_eq!(snapshot.location.as_deref(), Some("Nagpur"));
    }

    #[test]
    fn test_status_user_messages() {
        let unauthorized = WeatherError::Status {
            status: 401,
            body: String::new(),
        };
        assert!(unauthorized.user_message().contains("OPENWEATHER_API_KEY"));

        let missing = WeatherError::MissingField("main.temp");
        assert!(missing.to_string().contains("main.temp"));
    }
}
