//! One refresh: locate, then fetch current conditions and the forecast.

use std::future::Future;

use crate::provider::WeatherProvider;
use crate::types::{CurrentConditions, FetchStage, Forecast, Location, WeatherError};

/// Data sources used by [`run_refresh_cycle`]
pub trait WeatherSource {
    fn locate(&self) -> impl Future<Output = Result<Location, WeatherError>> + Send;

    fn current(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<CurrentConditions, WeatherError>> + Send;

    fn forecast(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<Forecast, WeatherError>> + Send;
}

impl WeatherSource for WeatherProvider {
    fn locate(&self) -> impl Future<Output = Result<Location, WeatherError>> + Send {
        self.location_resolver().resolve()
    }

    fn current(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<CurrentConditions, WeatherError>> + Send {
        self.fetch_current(location.latitude, location.longitude)
    }

    fn forecast(
        &self,
        location: &Location,
    ) -> impl Future<Output = Result<Forecast, WeatherError>> + Send {
        self.fetch_forecast(location.latitude, location.longitude)
    }
}

/// A failure tagged with the step it came from
#[derive(Debug)]
pub struct StageError {
    pub stage: FetchStage,
    pub error: WeatherError,
}

/// Everything one refresh produced
#[derive(Debug, Default)]
pub struct RefreshOutcome {
    pub location: Option<Location>,
    pub current: Option<CurrentConditions>,
    pub forecast: Option<Forecast>,
    /// False when the cycle stopped before the forecast request
    pub forecast_attempted: bool,
    /// Failures in the order they happened
    pub errors: Vec<StageError>,
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_for(&self, stage: FetchStage) -> Option<&WeatherError> {
        self.errors
            .iter()
            .find(|e| e.stage == stage)
            .map(|e| &e.error)
    }
}

/// Run one refresh against `source`.
///
/// Location comes first. If it fails neither weather request is made.
/// Otherwise both requests run in order and fail independently.
pub async fn run_refresh_cycle<S: WeatherSource>(source: &S) -> RefreshOutcome {
    let mut outcome = RefreshOutcome::default();

    let location = match source.locate().await {
        Ok(location) => location,
        Err(e) => {
            tracing::error!("Failed to resolve location: {}", e);
            outcome.errors.push(StageError {
                stage: FetchStage::Location,
                error: e,
            });
            return outcome;
        }
    };

    match source.current(&location).await {
        Ok(current) => outcome.current = Some(current),
        Err(e) => {
            tracing::warn!("Failed to fetch current weather: {}", e);
            outcome.errors.push(StageError {
                stage: FetchStage::Current,
                error: e,
            });
        }
    }

    outcome.forecast_attempted = true;
    match source.forecast(&location).await {
        Ok(forecast) => outcome.forecast = Some(forecast),
        Err(e) => {
            tracing::warn!("Failed to fetch forecast: {}", e);
            outcome.errors.push(StageError {
                stage: FetchStage::Forecast,
                error: e,
            });
        }
    }

    outcome.location = Some(location);
    outcome
}
