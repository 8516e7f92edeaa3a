//! Temperature trend plot.

use egui::{Color32, RichText, Ui};
use egui_plot::{uniform_grid_spacer, Legend, Line, Plot, PlotPoints};
use nimbus_weather::chart::{label_at, Series, TrendChart};

pub const CHART_TITLE: &str = "Temperature Trend";
pub const Y_AXIS_LABEL: &str = "Temperature (°C)";
pub const CHART_HEIGHT: f32 = 250.0;

/// Tomato
pub const MAX_COLOR: Color32 = Color32::from_rgb(255, 99, 71);
/// Deep sky blue
pub const MIN_COLOR: Color32 = Color32::from_rgb(0, 191, 255);

fn line(series: &Series, color: Color32) -> Line {
    Line::new(PlotPoints::from(series.points.clone()))
        .name(series.name)
        .color(color)
        .width(2.0)
}

pub fn show(ui: &mut Ui, chart: &TrendChart) {
    ui.vertical_centered(|ui| {
        ui.label(RichText::new(CHART_TITLE).strong().color(Color32::WHITE));
    });

    // One tick per day, labelled with the weekday
    let labels = chart.labels.clone();

    Plot::new("temperature_trend")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label(Y_AXIS_LABEL)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 1.0, 1.0]))
        .x_axis_formatter(move |mark, _range| {
            label_at(&labels, mark.value)
                .unwrap_or_default()
                .to_string()
        })
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.line(line(&chart.max, MAX_COLOR));
            plot_ui.line(line(&chart.min, MIN_COLOR));
        });
}
