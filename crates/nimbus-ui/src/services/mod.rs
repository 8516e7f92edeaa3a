pub mod clock_service;
pub mod weather_service;

use std::sync::Arc;

/// Wakes the UI thread after a message has been sent (a repaint request)
pub type Waker = Arc<dyn Fn() + Send + Sync>;

pub use clock_service::{ClockServiceMessage, ClockTicker};
pub use weather_service::{
    request_refresh as request_weather_refresh, WeatherError, WeatherServiceMessage,
};
