//! Weather backend: runs the refresh cycle off the UI thread.
//! Results are sent back via mpsc.

use std::sync::mpsc::Sender;
use std::sync::Arc;

use nimbus_core::ReqwestErrorExt;
use nimbus_weather::{
    run_refresh_cycle, FetchStage, RefreshOutcome, StageError, WeatherError as FetchError,
    WeatherSource,
};

use super::Waker;

/// Error type for weather operations, one variant per refresh step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    Location(String),
    Current(String),
    Forecast(String),
    NotInitialized,
}

impl std::fmt::Display for WeatherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherError::Location(s) => write!(f, "Location error: {}", s),
            WeatherError::Current(s) => write!(f, "Weather error: {}", s),
            WeatherError::Forecast(s) => write!(f, "Forecast error: {}", s),
            WeatherError::NotInitialized => write!(f, "Weather service not initialized"),
        }
    }
}

impl std::error::Error for WeatherError {}

impl From<StageError> for WeatherError {
    fn from(e: StageError) -> Self {
        let detail = match e.error {
            FetchError::Network(err) => err.into_network_error().to_string(),
            other => other.to_string(),
        };
        match e.stage {
            FetchStage::Location => WeatherError::Location(detail),
            FetchStage::Current => WeatherError::Current(detail),
            FetchStage::Forecast => WeatherError::Forecast(detail),
        }
    }
}

/// Messages sent from async operations back to the UI thread
#[derive(Debug)]
pub enum WeatherServiceMessage {
    /// A refresh cycle finished, successfully or not
    RefreshDone(RefreshOutcome),
}

/// Run one refresh cycle on `runtime`.
/// Sends `RefreshDone` on the channel and wakes the UI when complete.
pub fn request_refresh<S>(
    tx: &Sender<WeatherServiceMessage>,
    source: Arc<S>,
    runtime: &tokio::runtime::Handle,
    waker: Waker,
) where
    S: WeatherSource + Send + Sync + 'static,
{
    let tx = tx.clone();

    runtime.spawn(async move {
        let outcome = run_refresh_cycle(source.as_ref()).await;
        tracing::info!(
            "Refresh finished with {} error(s)",
            outcome.errors.len()
        );

        if tx.send(WeatherServiceMessage::RefreshDone(outcome)).is_err() {
            tracing::debug!("Weather channel closed, dropping refresh result");
            return;
        }
        waker();
    });
}
