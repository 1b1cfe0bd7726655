use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "resizer=debug,tower_http=debug";

/// Initialize tracing with either human-readable or JSON output
pub fn init_telemetry(log_format: &str, environment: &str) -> Result<(), Box<dyn std::error::Error>> {
    let json = log_format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .try_init()?;

    tracing::info!(log_format = if json { "json" } else { "pretty" }, environment, "Tracing initialized");
    Ok(())
}

pub async fn shutdown_telemetry() {
    tracing::debug!("Telemetry shutdown");
}
