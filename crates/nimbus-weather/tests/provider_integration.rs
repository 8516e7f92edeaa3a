//! Integration tests for the weather provider using wiremock.
//!
//! Every endpoint is pointed at a mock server so the location, current
//! weather and forecast requests can be checked and failed independently.

use nimbus_weather::{
    run_refresh_cycle, FetchStage, ProviderSettings, WeatherError, WeatherProvider,
};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer, api_key: Option<&str>) -> ProviderSettings {
    ProviderSettings {
        location_url: format!("{}/json", server.uri()),
        current_url: format!("{}/data/2.5/weather", server.uri()),
        forecast_url: format!("{}/v1/forecast", server.uri()),
        api_key: api_key.map(str::to_string),
        forecast_days: 7,
        timeout: Duration::from_secs(5),
    }
}

fn location_body() -> serde_json::Value {
    serde_json::json!({
        "status": "success",
        "country": "Switzerland",
        "regionName": "Zurich",
        "city": "Zurich",
        "lat": 47.37,
        "lon": 8.54,
        "query": "203.0.113.7"
    })
}

fn current_body() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 8.54, "lat": 47.37 },
        "weather": [{ "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }],
        "main": { "temp": 14.25, "feels_like": 13.6, "humidity": 72 },
        "name": "Zurich"
    })
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": 47.37,
        "longitude": 8.54,
        "timezone": "Europe/Zurich",
        "daily": {
            "time": ["2026-10-19", "2026-10-20", "2026-10-21", "2026-10-22",
                     "2026-10-23", "2026-10-24", "2026-10-25"],
            "temperature_2m_max": [14.2, 15.1, 12.8, 11.0, 13.4, 16.0, 15.5],
            "temperature_2m_min": [6.1, 7.0, 5.2, 3.9, 4.4, 8.3, 7.7],
            "weathercode": [3, 61, 80, 71, 2, 0, 95]
        }
    })
}

async fn mount_location(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(location_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_resolve_location() {
    let mock_server = MockServer::start().await;
    mount_location(&mock_server).await;

    let provider = WeatherProvider::new(settings(&mock_server, None)).unwrap();
    let location = provider.location_resolver().resolve().await.unwrap();

    assert_eq!(location.latitude, 47.37);
    assert_eq!(location.longitude, 8.54);
    assert_eq!(location.display_name(), "Zurich, Zurich");
}

#[tokio::test]
async fn test_location_status_fail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "fail",
            "message": "private range",
            "query": "192.168.1.10"
        })))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(settings(&mock_server, None)).unwrap();
    let err = provider.location_resolver().resolve().await.unwrap_err();

    assert!(matches!(err, WeatherError::Location(msg) if msg == "private range"));
}

#[tokio::test]
async fn test_fetch_current_sends_metric_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("lat", "47.37"))
        .and(query_param("lon", "8.54"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(settings(&mock_server, Some("test-key"))).unwrap();
    let current = provider.fetch_current(47.37, 8.54).await.unwrap();

    assert_eq!(current.condition_main, "Clouds");
    assert_eq!(current.display_description(), "Broken clouds");
    assert_eq!(current.temperature_celsius, 14.25);
}

#[tokio::test]
async fn test_fetch_current_unauthorized() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "cod": 401,
            "message": "Invalid API key."
        })))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(settings(&mock_server, Some("bad-key"))).unwrap();
    let err = provider.fetch_current(47.37, 8.54).await.unwrap_err();

    assert!(matches!(
        err,
        WeatherError::Status {
            stage: FetchStage::Current,
            status: 401
        }
    ));
}

#[tokio::test]
async fn test_fetch_forecast_sends_daily_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "47.37"))
        .and(query_param("longitude", "8.54"))
        .and(query_param(
            "daily",
            "temperature_2m_max,temperature_2m_min,weathercode",
        ))
        .and(query_param("forecast_days", "7"))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(settings(&mock_server, None)).unwrap();
    let forecast = provider.fetch_forecast(47.37, 8.54).await.unwrap();

    assert_eq!(forecast.len(), 7);
    assert_eq!(forecast.days[0].day_label(), "Mon");
    assert_eq!(forecast.days[3].condition_label(), "Snow");
    assert_eq!(forecast.days[6].condition_label(), "Thunderstorm");
    assert_eq!(forecast.days[1].temperature_range(), "15°C / 7°C");
}

#[tokio::test]
async fn test_fetch_forecast_mismatched_arrays() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "daily": {
                "time": ["2026-10-19", "2026-10-20"],
                "temperature_2m_max": [14.2],
                "temperature_2m_min": [6.1, 7.0],
                "weathercode": [3, 61]
            }
        })))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(settings(&mock_server, None)).unwrap();
    let err = provider.fetch_forecast(47.37, 8.54).await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn test_fetch_forecast_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(settings(&mock_server, None)).unwrap();
    let err = provider.fetch_forecast(47.37, 8.54).await.unwrap_err();

    assert_eq!(err.to_string(), "forecast service returned HTTP 503");
}

#[tokio::test]
async fn test_refresh_cycle_success() {
    let mock_server = MockServer::start().await;
    mount_location(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(settings(&mock_server, Some("test-key"))).unwrap();
    let outcome = run_refresh_cycle(&provider).await;

    assert!(outcome.is_success());
    assert_eq!(outcome.current.map(|c| c.condition_main).as_deref(), Some("Clouds"));
    assert_eq!(outcome.forecast.map(|f| f.len()), Some(7));
}

#[tokio::test]
async fn test_refresh_cycle_location_failure_makes_no_weather_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(settings(&mock_server, Some("test-key"))).unwrap();
    let outcome = run_refresh_cycle(&provider).await;

    assert!(!outcome.forecast_attempted);
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(
        outcome.error_for(FetchStage::Location),
        Some(WeatherError::Status {
            stage: FetchStage::Location,
            status: 500
        })
    ));
}

#[tokio::test]
async fn test_refresh_cycle_without_api_key_still_fetches_forecast() {
    let mock_server = MockServer::start().await;
    mount_location(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = WeatherProvider::new(settings(&mock_server, None)).unwrap();
    let outcome = run_refresh_cycle(&provider).await;

    assert!(outcome.current.is_none());
    assert!(matches!(
        outcome.error_for(FetchStage::Current),
        Some(WeatherError::Config(_))
    ));
    assert_eq!(outcome.forecast.map(|f| f.len()), Some(7));
}
