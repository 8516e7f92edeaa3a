use std::sync::{Arc, OnceLock};
use std::time::Duration;

use anyhow::Context;
use nimbus_core::Config;
use nimbus_weather::{AssetCatalog, ProviderSettings, WeatherProvider};

// Static tokio runtime that lives for the duration of the application
static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();

/// Get the shared runtime handle, building the runtime on first use
pub fn get_or_init_runtime() -> anyhow::Result<tokio::runtime::Handle> {
    if let Some(runtime) = RUNTIME.get() {
        return Ok(runtime.handle().clone());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("nimbus-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    // Another thread may have won the race; either runtime is fine to use
    if RUNTIME.set(runtime).is_err() {
        tracing::debug!("Tokio runtime already initialized");
    }

    RUNTIME
        .get()
        .map(|r| r.handle().clone())
        .context("Tokio runtime unavailable")
}

/// Translate the weather section of the config into provider settings
pub fn provider_settings(config: &Config) -> ProviderSettings {
    let weather = &config.weather;
    ProviderSettings {
        location_url: weather.location_url.clone(),
        current_url: weather.current_url.clone(),
        forecast_url: weather.forecast_url.clone(),
        api_key: weather.resolved_api_key(),
        forecast_days: weather.forecast_days,
        timeout: Duration::from_secs(weather.request_timeout_secs),
    }
}

/// Build the weather provider from config
pub fn initialize_weather_provider(config: &Config) -> anyhow::Result<Arc<WeatherProvider>> {
    let settings = provider_settings(config);
    if settings.api_key.is_none() {
        tracing::warn!(
            "No OpenWeather API key configured (set weather.api_key or {}); current conditions will fail",
            nimbus_core::config::API_KEY_ENV
        );
    }

    let provider = WeatherProvider::new(settings).context("Failed to create WeatherProvider")?;
    tracing::info!("Weather provider initialized");
    Ok(Arc::new(provider))
}

pub fn asset_catalog(config: &Config) -> AssetCatalog {
    AssetCatalog::new(
        config.assets.icons_dir.clone(),
        config.assets.backgrounds_dir.clone(),
        config.assets.default_background.clone(),
    )
}
