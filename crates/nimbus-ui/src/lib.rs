pub mod app;
pub mod bridge;
mod error_mapping;
pub mod models;
pub mod services;
pub mod widgets;

pub use app::NimbusApp;
