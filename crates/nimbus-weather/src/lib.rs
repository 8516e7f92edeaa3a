//! Weather data for Nimbus
//!
//! Resolves the caller's location from their public IP, fetches current
//! conditions (OpenWeather) and a daily forecast (Open-Meteo), and turns the
//! results into display data: condition assets and trend chart series.

pub mod assets;
pub mod chart;
pub mod cycle;
pub mod location;
pub mod provider;
pub mod types;

pub use assets::{AssetCatalog, AssetKind, ConditionAssets};
pub use chart::{Interpolation, Series, TrendChart};
pub use cycle::{run_refresh_cycle, RefreshOutcome, StageError, WeatherSource};
pub use location::LocationResolver;
pub use provider::{ProviderSettings, WeatherProvider};
pub use types::*;
