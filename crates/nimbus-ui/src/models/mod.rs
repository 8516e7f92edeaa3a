pub mod clock_model;
pub mod weather_model;

pub use clock_model::ClockModel;
pub use weather_model::{ErrorNotice, ForecastDayView, ForecastView, RefreshState, WeatherModel};
