use anyhow::{Context, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use skypost_social::{OAuthCredentials, XClient, X_API_URL};
use skypost_weather::provider::OPENWEATHER_API_URL;
use skypost_weather::OpenWeatherProvider;
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::{AppError, ConfigError};

pub const ENV_OPENWEATHER_API_KEY: &str = "OPENWEATHER_API_KEY";
pub const ENV_TWITTER_API_KEY: &str = "TWITTER_API_KEY";
pub const ENV_TWITTER_API_SECRET: &str = "TWITTER_API_SECRET";
pub const ENV_TWITTER_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const ENV_TWITTER_ACCESS_SECRET: &str = "TWITTER_ACCESS_SECRET";

/// Path to a settings file, overriding the default location
pub const ENV_CONFIG_PATH: &str = "SKYPOST_CONFIG";
pub const ENV_CITY: &str = "SKYPOST_CITY";
pub const ENV_COUNTRY: &str = "SKYPOST_COUNTRY";
pub const ENV_TIMEZONE: &str = "SKYPOST_TIMEZONE";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Non-secret settings, optionally read from a TOML file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// City the reports are about
    pub city: String,

    /// ISO 3166 country code used to disambiguate the city
    pub country: String,

    /// IANA timezone used for sunrise/sunset times
    pub timezone: String,

    /// Root of the OpenWeather 2.5 API
    pub openweather_url: String,

    /// Root of the X API
    pub x_api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            city: "Nagpur".to_string(),
            country: "IN".to_string(),
            timezone: "Asia/Kolkata".to_string(),
            openweather_url: OPENWEATHER_API_URL.to_string(),
            x_api_url: X_API_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the given file, or from the default location if it
    /// exists, or fall back to defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.display().to_string()));
            }
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => path,
                None => {
                    tracing::debug!("No settings file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        Self::load_from(&path).map_err(|e| ConfigError::ParseError(format!("{:#}", e)))
    }

    /// Read and parse a settings file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents).context("Failed to parse settings file")?;

        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// `<config_dir>/skypost/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skypost").join("config.toml"))
    }

    /// Apply `SKYPOST_*` environment overrides on top of file settings
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(city) = non_empty(ENV_CITY) {
            self.city = city;
        }
        if let Some(country) = non_empty(ENV_COUNTRY) {
            self.country = country;
        }
        if let Some(timezone) = non_empty(ENV_TIMEZONE) {
            self.timezone = timezone;
        }
    }

    /// Parsed IANA timezone
    pub fn tz(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Invalid(format!("unknown timezone: {}", self.timezone)))
    }

    /// Validate the settings
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.city.trim().is_empty() {
            result.add_error("city", "City must not be empty");
        }

        if self.country.is_empty() {
            result.add_warning("country", "No country code; the city name may be ambiguous");
        } else if self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_alphabetic()) {
            result.add_warning(
                "country",
                format!("Expected a two-letter country code, got: {}", self.country),
            );
        }

        if self.tz().is_err() {
            result.add_error(
                "timezone",
                format!("Unknown IANA timezone: {}", self.timezone),
            );
        }

        validate_url(&self.openweather_url, "openweather_url", &mut result);
        validate_url(&self.x_api_url, "x_api_url", &mut result);

        result
    }
}

/// Validate a URL field
fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            } else if url.scheme() == "http" {
                result.add_warning(field_name, "URL is not using https");
            }

            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}

/// Secrets read from the environment
#[derive(Clone)]
pub struct Credentials {
    pub openweather_api_key: String,
    pub x: OAuthCredentials,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openweather_api_key", &"<redacted>")
            .field("x", &self.x)
            .finish()
    }
}

/// Everything a run needs, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub credentials: Credentials,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let explicit_path = lookup(ENV_CONFIG_PATH).map(PathBuf::from);
        let mut settings = Settings::load(explicit_path.as_deref())?;
        settings.apply_overrides(&lookup);
        Self::from_parts(settings, lookup)
    }

    /// Combine already loaded settings with credentials from `lookup`.
    ///
    /// Every missing credential is reported at once.
    pub fn from_parts<F>(settings: Settings, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut require = |key: &'static str| {
            match lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
                Some(value) => value,
                None => {
                    missing.push(key);
                    String::new()
                }
            }
        };

        let openweather_api_key = require(ENV_OPENWEATHER_API_KEY);
        let x = OAuthCredentials {
            consumer_key: require(ENV_TWITTER_API_KEY),
            consumer_secret: require(ENV_TWITTER_API_SECRET),
            access_token: require(ENV_TWITTER_ACCESS_TOKEN),
            access_secret: require(ENV_TWITTER_ACCESS_SECRET),
        };

        if !missing.is_empty() {
            return Err(ConfigError::MissingSetting(missing.join(", ")));
        }

        let validation = settings.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(Self {
            settings,
            credentials: Credentials {
                openweather_api_key,
                x,
            },
        })
    }

    /// Weather provider for the configured location
    pub fn weather_provider(&self) -> Result<OpenWeatherProvider, AppError> {
        Ok(OpenWeatherProvider::with_base_url(
            &self.settings.openweather_url,
            &self.credentials.openweather_api_key,
            &self.settings.city,
            &self.settings.country,
        )?)
    }

    /// Publisher authenticated with the configured account
    pub fn publisher(&self) -> Result<XClient, AppError> {
        Ok(XClient::with_base_url(
            &self.settings.x_api_url,
            self.credentials.x.clone(),
        )?)
    }
}
