use clap::{Parser, ValueEnum};
use skypost_core::{AppError, Config, ReportKind};
use skypost_social::PostReceipt;
use std::process::ExitCode;

/// Post a weather, air quality or sunset update for the configured city.
///
/// Credentials are read from OPENWEATHER_API_KEY, TWITTER_API_KEY,
/// TWITTER_API_SECRET, TWITTER_ACCESS_TOKEN and TWITTER_ACCESS_SECRET.
#[derive(Debug, Parser)]
#[command(name = "skypost", version, about)]
struct Cli {
    /// Report to produce and publish
    #[arg(value_enum)]
    report: Report,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Report {
    /// Temperature, conditions and humidity
    Weather,
    /// PM2.5 based air quality index
    Aqi,
    /// Today's sunset and sunrise
    Sunset,
}

impl From<Report> for ReportKind {
    fn from(report: Report) -> Self {
        match report {
            Report::Weather => ReportKind::Weather,
            Report::Aqi => ReportKind::Aqi,
            Report::Sunset => ReportKind::Sunset,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Missing or unknown report prints usage and exits with status 2
    let cli = Cli::parse();

    if let Err(e) = skypost_core::init() {
        eprintln!("skypost: {:#}", e);
        return ExitCode::FAILURE;
    }

    match post(cli.report.into()).await {
        Ok(receipt) => {
            tracing::info!("Posted {}", receipt.id);
            println!("{}", receipt.text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("skypost: {}", e.diagnostic());
            ExitCode::from(e.exit_code())
        }
    }
}

async fn post(kind: ReportKind) -> Result<PostReceipt, AppError> {
    let config = Config::from_env()?;
    let provider = config.weather_provider()?;
    let publisher = config.publisher()?;

    tracing::info!(
        "Producing {} report for {}, {}",
        kind,
        config.settings.city,
        config.settings.country
    );
    skypost_core::run(kind, &provider, &publisher, &config.settings).await
}
