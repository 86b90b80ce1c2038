use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use skycast_api::format::{format_humidity, format_temperature, format_wind_speed};
use skycast_api::BackendClient;
use skycast_app::App;
use skycast_core::{AppError, Config, Units};
use skycast_geo::Geocoder;

/// One-off unit override for this invocation; preferences stay untouched.
const ENV_UNITS: &str = "SKYCAST_UNITS";

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _validation) = Config::load_validated()?;
    let api = Arc::new(
        BackendClient::new(&config.backend.base_url, &config.backend.forecast_path)
            .map_err(AppError::from)?,
    );
    let geocoder = Arc::new(
        Geocoder::new(&config.provider.base_url, config.provider.api_key.clone())
            .map_err(AppError::from)?,
    );

    tracing::info!("Skycast starting against {}", config.backend.base_url);

    let mut app = App::new(api);
    app.load().await;

    if let Ok(raw) = std::env::var(ENV_UNITS) {
        match raw.parse::<Units>() {
            Ok(units) => app.override_units(units).await,
            Err(e) => tracing::warn!("Ignoring {ENV_UNITS}: {e}"),
        }
    }

    if let Some(error) = app.fetch_error() {
        println!("Backend unavailable: {error}");
        return Ok(());
    }

    let metrics = app.metrics(Utc::now());
    println!("Skycast - Weather Dashboard");
    println!(
        "\n{} locations tracked ({} favorites), {} synced, {} stale",
        metrics.total, metrics.favorites, metrics.synced, metrics.stale
    );
    println!("Sync coverage: {}", metrics.sync_coverage);
    println!("System health: {}", metrics.health);
    let units = app.units();
    for location in app.locations() {
        println!(
            "  {} [{}]: {}, wind {}, humidity {}",
            location.label(),
            location.country,
            format_temperature(location.weather.temperature, units),
            format_wind_speed(location.weather.wind_speed, units),
            format_humidity(location.weather.humidity),
        );
    }
    if !metrics.recent_activity.is_empty() {
        println!("\nRecent activity:");
        for entry in &metrics.recent_activity {
            println!("  {} ({})", entry.message, entry.time_ago);
        }
    }
    if !geocoder.is_configured() {
        println!("\nNote: no weather API key configured; location search is disabled.");
    }

    Ok(())
}
