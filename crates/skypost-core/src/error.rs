//! Centralized error types for skypost.
//!
//! Every failure in a run converts into [`AppError`], which decides the
//! process exit code at the top-level boundary in `main`.

use skypost_social::PostError;
use skypost_weather::{AqiError, WeatherError};
use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data unavailable: {0}")]
    DataUnavailable(#[from] WeatherError),

    #[error("Air quality error: {0}")]
    Aqi(#[from] AqiError),

    #[error("Post failed: {0}")]
    PostFailed(#[from] PostError),
}

impl AppError {
    /// Returns a message suitable for showing to the operator.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => e.user_message().to_string(),
            AppError::DataUnavailable(e) => e.user_message().to_string(),
            AppError::Aqi(e) => e.user_message().to_string(),
            AppError::PostFailed(e) => e.user_message(),
        }
    }

    /// Friendly message followed by the underlying cause, for stderr.
    pub fn diagnostic(&self) -> String {
        format!("{}\n  caused by: {}", self.user_message(), self)
    }

    /// Process exit code (sysexits.h values).
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Config(_) => 78,          // EX_CONFIG
            AppError::DataUnavailable(_) => 69, // EX_UNAVAILABLE
            AppError::Aqi(_) => 65,             // EX_DATAERR
            AppError::PostFailed(_) => 75,      // EX_TEMPFAIL
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Missing required setting: {0}")]
    MissingSetting(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration file not found. Check SKYPOST_CONFIG.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::MissingSetting(_) => {
                "A required environment variable is missing. Set the API credentials and retry."
            }
        }
    }
}
