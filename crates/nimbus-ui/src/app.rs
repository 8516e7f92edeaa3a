//! The weather window.
//!
//! `NimbusApp` drains service messages into its models, draws them, and then
//! applies whatever the user clicked. Drawing only reads the models.

use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use egui::{Align2, Color32, RichText, Ui};
use nimbus_core::Config;
use nimbus_weather::{RefreshOutcome, WeatherProvider};

use crate::bridge;
use crate::models::weather_model::NO_FORECAST_TEXT;
use crate::models::{ClockModel, ForecastView, WeatherModel};
use crate::services::{
    request_weather_refresh, ClockServiceMessage, ClockTicker, Waker, WeatherError,
    WeatherServiceMessage,
};
use crate::widgets;

const ICON_SIZE: f32 = 100.0;
const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// What the user asked for during one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Refresh,
    SetShowChart(bool),
    DismissNotice,
}

pub struct NimbusApp {
    weather: WeatherModel,
    clock: ClockModel,
    provider: Option<Arc<WeatherProvider>>,
    runtime: Option<tokio::runtime::Handle>,
    waker: Waker,
    weather_tx: Sender<WeatherServiceMessage>,
    weather_rx: Receiver<WeatherServiceMessage>,
    clock_rx: Receiver<ClockServiceMessage>,
    _clock_ticker: Option<ClockTicker>,
}

impl NimbusApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let runtime = match bridge::get_or_init_runtime() {
            Ok(runtime) => Some(runtime),
            Err(e) => {
                tracing::error!("{:#}", e);
                None
            }
        };

        let provider = match bridge::initialize_weather_provider(&config) {
            Ok(provider) => Some(provider),
            Err(e) => {
                tracing::error!("{:#}", e);
                None
            }
        };

        Self::with_services(cc.egui_ctx.clone(), &config, runtime, provider)
    }

    fn with_services(
        ctx: egui::Context,
        config: &Config,
        runtime: Option<tokio::runtime::Handle>,
        provider: Option<Arc<WeatherProvider>>,
    ) -> Self {
        let waker: Waker = Arc::new(move || ctx.request_repaint());

        let (weather_tx, weather_rx) = channel();
        let (clock_tx, clock_rx) = channel();
        let clock_ticker = runtime
            .as_ref()
            .map(|rt| ClockTicker::start(clock_tx, rt, waker.clone(), CLOCK_PERIOD));

        let mut app = Self {
            weather: WeatherModel::new(bridge::asset_catalog(config), config.ui.show_chart),
            clock: ClockModel::new(),
            provider,
            runtime,
            waker,
            weather_tx,
            weather_rx,
            clock_rx,
            _clock_ticker: clock_ticker,
        };

        // First load happens straight away. Missing services are reported by it.
        app.refresh();
        app
    }

    fn refresh(&mut self) {
        if !self.weather.begin_refresh() {
            return;
        }

        match (&self.provider, &self.runtime) {
            (Some(provider), Some(runtime)) => {
                tracing::info!("Refreshing weather");
                request_weather_refresh(
                    &self.weather_tx,
                    provider.clone(),
                    runtime,
                    self.waker.clone(),
                );
            }
            _ => {
                self.weather.apply_outcome(RefreshOutcome::default());
                self.weather.push_error(WeatherError::NotInitialized);
            }
        }
    }

    fn poll_channels(&mut self) {
        while let Ok(message) = self.weather_rx.try_recv() {
            match message {
                WeatherServiceMessage::RefreshDone(outcome) => self.weather.apply_outcome(outcome),
            }
        }

        while let Ok(message) = self.clock_rx.try_recv() {
            match message {
                ClockServiceMessage::Tick(now) => self.clock.tick(now),
            }
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Refresh => self.refresh(),
            UiAction::SetShowChart(show) => self.weather.set_show_chart(show),
            UiAction::DismissNotice => self.weather.dismiss_notice(),
        }
    }
}

impl eframe::App for NimbusApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_channels();

        let actions = render(ctx, &self.weather, &self.clock);
        for action in actions {
            self.apply(action);
        }
    }
}

fn file_uri(path: &Path) -> String {
    format!("file://{}", path.display())
}

fn white(text: impl Into<String>) -> RichText {
    RichText::new(text).color(Color32::WHITE)
}

/// Draw one frame from the models and collect the user's actions
pub fn render(ctx: &egui::Context, weather: &WeatherModel, clock: &ClockModel) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::CentralPanel::default()
        .frame(egui::Frame::none().fill(Color32::from_gray(30)))
        .show(ctx, |ui| {
            egui::Image::new(file_uri(weather.background())).paint_at(ui, ui.max_rect());

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(12.0);
                header(ui, clock);
                ui.add_space(8.0);
                current_conditions(ui, weather, &mut actions);
                ui.add_space(16.0);
                forecast(ui, weather);
            });
        });

    if let Some(notice) = weather.current_notice() {
        egui::Window::new(notice.title.as_str())
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(notice.message.as_str());
                ui.label(RichText::new(notice.hint).weak());
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    actions.push(UiAction::DismissNotice);
                }
            });
    }

    actions
}

fn header(ui: &mut Ui, clock: &ClockModel) {
    ui.horizontal(|ui| {
        ui.heading(white("Today's Weather").strong().size(28.0));
        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
            ui.label(white(clock.text()).size(16.0));
        });
    });
}

fn current_conditions(ui: &mut Ui, weather: &WeatherModel, actions: &mut Vec<UiAction>) {
    ui.horizontal(|ui| {
        ui.add(
            egui::Image::new(file_uri(weather.icon()))
                .fit_to_exact_size(egui::vec2(ICON_SIZE, ICON_SIZE)),
        );
        ui.label(white(weather.current_text()).size(18.0));
    });

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        let button = egui::Button::new(weather.refresh_label());
        if ui.add_enabled(weather.refresh_enabled(), button).clicked() {
            actions.push(UiAction::Refresh);
        }

        let mut show_chart = weather.show_chart();
        if ui
            .checkbox(&mut show_chart, white("Show Temperature Graph"))
            .changed()
        {
            actions.push(UiAction::SetShowChart(show_chart));
        }
    });
}

fn forecast(ui: &mut Ui, weather: &WeatherModel) {
    ui.heading(white("7-Day Forecast").strong());
    ui.add_space(4.0);

    match weather.forecast() {
        ForecastView::Pending => {
            ui.spinner();
        }
        ForecastView::NoData => {
            ui.label(white(NO_FORECAST_TEXT));
        }
        ForecastView::Ready { days, chart } => {
            widgets::forecast_strip::show(ui, days);
            if weather.show_chart() {
                ui.add_space(12.0);
                widgets::chart::show(ui, chart);
            }
        }
    }
}
