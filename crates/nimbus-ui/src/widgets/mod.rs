pub mod chart;
pub mod forecast_strip;
