//! HTTP provider for current conditions and the daily forecast.

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

use crate::location::LocationResolver;
use crate::types::{CurrentConditions, FetchStage, Forecast, WeatherError};

/// Daily variables requested from the forecast endpoint
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,weathercode";

/// Endpoints and request settings for [`WeatherProvider`]
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub location_url: String,
    pub current_url: String,
    pub forecast_url: String,
    pub api_key: Option<String>,
    pub forecast_days: u8,
    pub timeout: Duration,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            location_url: "http://ip-api.com/json".to_string(),
            current_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            api_key: None,
            forecast_days: 7,
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenWeatherResponse {
    weather: Vec<OpenWeatherCondition>,
    main: OpenWeatherMain,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherCondition {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OpenWeatherMain {
    temp: f64,
}

impl OpenWeatherResponse {
    fn into_conditions(self) -> Result<CurrentConditions, WeatherError> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Parse("weather array is empty".to_string()))?;

        Ok(CurrentConditions {
            condition_main: condition.main,
            description: condition.description,
            temperature_celsius: self.main.temp,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    daily: Option<OpenMeteoDaily>,
}

#[derive(Debug, Deserialize)]
struct OpenMeteoDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<Option<f64>>,
    temperature_2m_min: Vec<Option<f64>>,
    weathercode: Vec<Option<i32>>,
}

impl OpenMeteoResponse {
    fn into_forecast(self) -> Result<Forecast, WeatherError> {
        let daily = self
            .daily
            .ok_or_else(|| WeatherError::Parse("forecast response has no daily block".to_string()))?;

        Forecast::from_daily(
            &daily.time,
            &daily.temperature_2m_max,
            &daily.temperature_2m_min,
            &daily.weathercode,
        )
    }
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    location: LocationResolver,
    current_url: String,
    forecast_url: String,
    api_key: Option<String>,
    forecast_days: u8,
}

impl WeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("nimbus/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            location: LocationResolver::new(client.clone(), settings.location_url),
            client: Arc::new(client),
            current_url: settings.current_url,
            forecast_url: settings.forecast_url,
            api_key: settings.api_key,
            forecast_days: settings.forecast_days,
        })
    }

    pub fn location_resolver(&self) -> &LocationResolver {
        &self.location
    }

    /// Current conditions in metric units.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<CurrentConditions, WeatherError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeatherError::Config("no API key configured for current weather".to_string()))?;

        let request = self.client.get(&self.current_url).query(&[
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
        ]);

        let response: OpenWeatherResponse = self.get_json(FetchStage::Current, request).await?;
        let conditions = response.into_conditions()?;
        tracing::info!(
            "Current weather: {} ({}), {:.1}°C",
            conditions.condition_main,
            conditions.description,
            conditions.temperature_celsius
        );
        Ok(conditions)
    }

    /// Daily max/min temperature and weather code, timezone resolved by the server.
    #[instrument(skip(self), level = "info")]
    pub async fn fetch_forecast(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<Forecast, WeatherError> {
        let request = self.client.get(&self.forecast_url).query(&[
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("forecast_days", self.forecast_days.to_string()),
            ("timezone", "auto".to_string()),
        ]);

        let response: OpenMeteoResponse = self.get_json(FetchStage::Forecast, request).await?;
        let forecast = response.into_forecast()?;
        tracing::info!("Fetched {}-day forecast", forecast.len());
        Ok(forecast)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        stage: FetchStage,
        request: RequestBuilder,
    ) -> Result<T, WeatherError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} request returned status {}", stage, status);
            return Err(WeatherError::Status {
                stage,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("{} response: {}", stage, e)))
    }
}
