use egui::{Color32, Frame, RichText, Rounding, Ui};

use crate::models::ForecastDayView;

const CELL_FILL: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 110);

/// Row of day cells: weekday, condition label, max/min temperatures
pub fn show(ui: &mut Ui, days: &[ForecastDayView]) {
    ui.horizontal_wrapped(|ui| {
        for day in days {
            Frame::none()
                .fill(CELL_FILL)
                .rounding(Rounding::same(8.0))
                .inner_margin(8.0)
                .show(ui, |ui| {
                    ui.set_min_width(110.0);
                    ui.vertical_centered(|ui| {
                        ui.label(RichText::new(&day.day).strong().color(Color32::WHITE));
                        ui.label(RichText::new(day.condition).color(Color32::WHITE));
                        ui.label(RichText::new(&day.temperatures).color(Color32::WHITE));
                    });
                });
        }
    });
}
