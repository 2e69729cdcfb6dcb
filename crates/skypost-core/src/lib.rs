pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::{Config, Credentials, Settings, ValidationResult};
pub use error::{AppError, ConfigError};
pub use pipeline::{compose, run};
pub use report::{render, ReportKind};

use anyhow::Result;

/// Initialize logging. Output goes to stderr so stdout only carries post text.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    tracing::debug!("skypost core initialized");
    Ok(())
}
