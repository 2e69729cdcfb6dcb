//! Weather and air quality for skypost
//!
//! Fetches current conditions and pollutant readings from OpenWeather and
//! normalizes PM2.5 concentrations onto the 0-500 AQI scale.

pub mod aqi;
pub mod provider;
pub mod types;

pub use aqi::{classify, compute_index, normalize, AqiCategory, AqiError, AqiResult};
pub use provider::{observe, ObservationProvider, OpenWeatherProvider};
pub use types::*;
