//! Fetch, render and publish one report.

use skypost_social::{PostReceipt, Publisher};
use skypost_weather::{observe, ObservationProvider};

use crate::config::Settings;
use crate::error::AppError;
use crate::report::{render, ReportKind};

/// Fetch what `kind` needs from `provider` and render the post text.
pub async fn compose<P: ObservationProvider>(
    kind: ReportKind,
    provider: &P,
    settings: &Settings,
) -> Result<String, AppError> {
    let tz = settings.tz()?;
    let snapshot = observe(provider, kind.needs_pollution()).await?;
    render(kind, &snapshot, &settings.city, tz)
}

/// Compose the report and hand it to `publisher`.
pub async fn run<P: ObservationProvider, Q: Publisher>(
    kind: ReportKind,
    provider: &P,
    publisher: &Q,
    settings: &Settings,
) -> Result<PostReceipt, AppError> {
    let text = compose(kind, provider, settings).await?;
    tracing::info!("Publishing {} report ({} chars)", kind, text.chars().count());

    let receipt = publisher.publish(&text).await?;
    Ok(receipt)
}
