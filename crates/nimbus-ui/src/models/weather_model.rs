//! Owned presentation state for the weather window.
//!
//! The egui loop owns one `WeatherModel`; service messages are applied to it
//! and the window only reads it when drawing.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use nimbus_core::AppError;
use nimbus_weather::{AssetCatalog, Forecast, RefreshOutcome, TrendChart};

use crate::services::weather_service::WeatherError as UiWeatherError;

pub const INITIAL_CURRENT_TEXT: &str = "Getting weather data...";
pub const NO_FORECAST_TEXT: &str = "No forecast data available.";
pub const REFRESH_LABEL: &str = "Refresh";
pub const REFRESHING_LABEL: &str = "Refreshing...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshState {
    #[default]
    Idle,
    Refreshing,
}

/// One error dialog waiting to be acknowledged
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorNotice {
    pub title: String,
    pub message: String,
    /// Short actionable advice
    pub hint: &'static str,
}

impl ErrorNotice {
    pub fn from_app_error(err: &AppError) -> Self {
        let message = match err {
            AppError::Weather(inner) => inner.to_string(),
            other => other.to_string(),
        };
        Self {
            title: "Error".to_string(),
            message,
            hint: err.user_message(),
        }
    }
}

/// One cell of the forecast strip
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDayView {
    pub day: String,
    pub condition: &'static str,
    pub temperatures: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastView {
    /// Nothing fetched yet
    Pending,
    Ready {
        days: Vec<ForecastDayView>,
        chart: TrendChart,
    },
    NoData,
}

impl ForecastView {
    fn from_forecast(forecast: &Forecast) -> Self {
        if forecast.is_empty() {
            return ForecastView::NoData;
        }

        let days = forecast
            .days
            .iter()
            .map(|d| ForecastDayView {
                day: d.day_label(),
                condition: d.condition_label(),
                temperatures: d.temperature_range(),
            })
            .collect();

        ForecastView::Ready {
            days,
            chart: TrendChart::from_forecast(forecast),
        }
    }
}

#[derive(Debug)]
pub struct WeatherModel {
    state: RefreshState,
    current_text: String,
    icon: PathBuf,
    background: PathBuf,
    forecast: ForecastView,
    show_chart: bool,
    notices: VecDeque<ErrorNotice>,
    catalog: AssetCatalog,
}

impl WeatherModel {
    pub fn new(catalog: AssetCatalog, show_chart: bool) -> Self {
        Self {
            state: RefreshState::Idle,
            current_text: INITIAL_CURRENT_TEXT.to_string(),
            icon: catalog.default_icon(),
            background: catalog.default_background().to_path_buf(),
            forecast: ForecastView::Pending,
            show_chart,
            notices: VecDeque::new(),
            catalog,
        }
    }

    pub fn state(&self) -> RefreshState {
        self.state
    }

    pub fn is_refreshing(&self) -> bool {
        self.state == RefreshState::Refreshing
    }

    pub fn refresh_enabled(&self) -> bool {
        !self.is_refreshing()
    }

    pub fn refresh_label(&self) -> &'static str {
        match self.state {
            RefreshState::Idle => REFRESH_LABEL,
            RefreshState::Refreshing => REFRESHING_LABEL,
        }
    }

    /// Idle -> Refreshing. Returns false, changing nothing, if a refresh is
    /// already running.
    pub fn begin_refresh(&mut self) -> bool {
        if self.is_refreshing() {
            tracing::debug!("Refresh already in progress");
            return false;
        }
        self.state = RefreshState::Refreshing;
        true
    }

    /// Apply a finished cycle and go back to Idle.
    ///
    /// Failed steps leave their part of the display as it was, except the
    /// forecast which switches to the no-data placeholder. A forecast that
    /// was never loaded stops loading once any cycle finishes.
    pub fn apply_outcome(&mut self, outcome: RefreshOutcome) {
        if !self.is_refreshing() {
            tracing::warn!("Refresh result arrived while idle");
        }

        if let (Some(location), Some(current)) = (&outcome.location, &outcome.current) {
            self.current_text = current.summary(location);
            let assets = self.catalog.select(&current.condition_main);
            self.icon = assets.icon;
            self.background = assets.background;
        }

        if outcome.forecast_attempted {
            self.forecast = match &outcome.forecast {
                Some(forecast) => ForecastView::from_forecast(forecast),
                None => ForecastView::NoData,
            };
        } else if self.forecast == ForecastView::Pending {
            self.forecast = ForecastView::NoData;
        }

        for stage_error in outcome.errors {
            self.push_error(UiWeatherError::from(stage_error));
        }

        self.state = RefreshState::Idle;
    }

    pub fn push_error(&mut self, err: UiWeatherError) {
        let app_err = AppError::from(err);
        tracing::error!("{}", app_err);
        self.notices.push_back(ErrorNotice::from_app_error(&app_err));
    }

    /// The notice to show now, oldest first
    pub fn current_notice(&self) -> Option<&ErrorNotice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    #[cfg(test)]
    pub(crate) fn pending_notices(&self) -> usize {
        self.notices.len()
    }

    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    pub fn icon(&self) -> &Path {
        &self.icon
    }

    pub fn background(&self) -> &Path {
        &self.background
    }

    pub fn forecast(&self) -> &ForecastView {
        &self.forecast
    }

    pub fn show_chart(&self) -> bool {
        self.show_chart
    }

    pub fn set_show_chart(&mut self, show: bool) {
        self.show_chart = show;
    }
}
