//! Observation providers.
//!
//! [`ObservationProvider`] is the seam between the report pipeline and a
//! concrete weather service. [`OpenWeatherProvider`] talks to the
//! OpenWeather 2.5 API.

use crate::types::{
    Coordinates, ObservationSnapshot, PollutionReading, ProviderAqiLevel, SunTimes,
    WeatherError, WeatherReading,
};
use chrono::DateTime;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use url::Url;

pub const OPENWEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// A source of current weather and pollution readings for one fixed place.
pub trait ObservationProvider {
    /// Fetch current conditions.
    fn current_weather(&self) -> impl Future<Output = Result<WeatherReading, WeatherError>> + Send;

    /// Fetch pollutant readings for the given coordinates.
    fn air_pollution(
        &self,
        at: Coordinates,
    ) -> impl Future<Output = Result<PollutionReading, WeatherError>> + Send;
}

/// Build a snapshot: one weather request and, if asked, one pollution
/// request at the coordinates the weather response reported.
pub async fn observe<P: ObservationProvider>(
    provider: &P,
    include_pollution: bool,
) -> Result<ObservationSnapshot, WeatherError> {
    let weather = provider.current_weather().await?;

    let pollution = if include_pollution {
        Some(provider.air_pollution(weather.coordinates).await?)
    } else {
        None
    };

    Ok(ObservationSnapshot::new(weather, pollution))
}

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    coord: Option<RawCoord>,
    #[serde(default)]
    weather: Vec<RawCondition>,
    main: Option<RawMain>,
    sys: Option<RawSys>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCoord {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawCondition {
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct AirPollutionResponse {
    #[serde(default)]
    list: Vec<RawPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct RawPollutionEntry {
    main: Option<RawAqi>,
    components: Option<RawComponents>,
}

#[derive(Debug, Deserialize)]
struct RawAqi {
    aqi: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct RawComponents {
    pm2_5: Option<f64>,
}

impl CurrentWeatherResponse {
    fn into_reading(self) -> Result<WeatherReading, WeatherError> {
        let main = self.main.ok_or(WeatherError::MissingField("main"))?;
        let temperature = main.temp.ok_or(WeatherError::MissingField("main.temp"))?;
        let humidity = main
            .humidity
            .ok_or(WeatherError::MissingField("main.humidity"))?;

        let condition = self
            .weather
            .into_iter()
            .next()
            .and_then(|w| w.description)
            .ok_or(WeatherError::MissingField("weather[0].description"))?;

        let coord = self.coord.ok_or(WeatherError::MissingField("coord"))?;
        let coordinates = Coordinates {
            latitude: coord.lat.ok_or(WeatherError::MissingField("coord.lat"))?,
            longitude: coord.lon.ok_or(WeatherError::MissingField("coord.lon"))?,
        };

        let sun = self.sys.and_then(|sys| {
            Some(SunTimes {
                sunrise: DateTime::from_timestamp(sys.sunrise?, 0)?,
                sunset: DateTime::from_timestamp(sys.sunset?, 0)?,
            })
        });

        Ok(WeatherReading {
            location: self.name.filter(|n| !n.is_empty()),
            coordinates,
            temperature,
            feels_like: main.feels_like,
            humidity: humidity.round().clamp(0.0, 100.0) as u8,
            condition,
            sun,
        })
    }
}

impl AirPollutionResponse {
    fn into_reading(self) -> PollutionReading {
        let Some(entry) = self.list.into_iter().next() else {
            return PollutionReading::default();
        };

        PollutionReading {
            pm25: entry.components.and_then(|c| c.pm2_5),
            level: entry
                .main
                .and_then(|m| m.aqi)
                .and_then(ProviderAqiLevel::from_level),
        }
    }
}

/// OpenWeather client for a single city query (e.g. `Nagpur,IN`).
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    client: Arc<Client>,
    base_url: Url,
    api_key: String,
    query: String,
}

impl OpenWeatherProvider {
    pub fn new(api_key: &str, city: &str, country: &str) -> Result<Self, WeatherError> {
        Self::with_base_url(OPENWEATHER_API_URL, api_key, city, country)
    }

    /// Create a provider against a non-default API root (mirrors, test servers).
    pub fn with_base_url(
        base_url: &str,
        api_key: &str,
        city: &str,
        country: &str,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        // Url::join replaces the last path segment unless the base ends in '/'
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{}/", base_url))?
        };

        let query = if country.is_empty() {
            city.to_string()
        } else {
            format!("{},{}", city, country)
        };

        Ok(Self {
            client: Arc::new(client),
            base_url,
            api_key: api_key.to_string(),
            query,
        })
    }

    /// The `q` parameter sent with weather requests
    pub fn query(&self) -> &str {
        &self.query
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = self.base_url.join(endpoint)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| WeatherError::Parse(e.to_string()))
    }
}

impl ObservationProvider for OpenWeatherProvider {
    #[instrument(skip(self), fields(query = %self.query), level = "info")]
    async fn current_weather(&self) -> Result<WeatherReading, WeatherError> {
        let params = [("q", self.query.clone()), ("units", "metric".to_string())];
        let body: CurrentWeatherResponse = self.get_json("weather", &params).await?;
        let reading = body.into_reading()?;

        tracing::info!(
            "Current weather: {}°C, {}, humidity {}%",
            reading.temperature,
            reading.condition,
            reading.humidity
        );
        Ok(reading)
    }

    #[instrument(skip(self), level = "info")]
    async fn air_pollution(&self, at: Coordinates) -> Result<PollutionReading, WeatherError> {
        let params = [
            ("lat", at.latitude.to_string()),
            ("lon", at.longitude.to_string()),
        ];
        let body: AirPollutionResponse = self.get_json("air_pollution", &params).await?;
        let reading = body.into_reading();

        if reading.pm25.is_none() {
            tracing::warn!("Air pollution response carried no PM2.5 reading");
        } else {
            tracing::info!("PM2.5: {:?} µg/m³", reading.pm25);
        }
        Ok(reading)
    }
}
