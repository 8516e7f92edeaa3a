use crate::services::weather_service::WeatherError as UiWeatherError;
use nimbus_core::{AppError, WeatherError};

impl From<UiWeatherError> for AppError {
    fn from(e: UiWeatherError) -> Self {
        match e {
            UiWeatherError::Location(s) => AppError::Weather(WeatherError::LocationNotFound(s)),
            UiWeatherError::Current(s) => AppError::Weather(WeatherError::ApiError(s)),
            UiWeatherError::Forecast(s) => AppError::Weather(WeatherError::ForecastUnavailable(s)),
            UiWeatherError::NotInitialized => AppError::Weather(WeatherError::ServiceUnavailable),
        }
    }
}
