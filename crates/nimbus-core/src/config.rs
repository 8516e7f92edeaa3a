use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

type Result<T> = std::result::Result<T, ConfigError>;

/// Environment variable consulted when no API key is configured
pub const API_KEY_ENV: &str = "NIMBUS_OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Window and layout preferences
    #[serde(default)]
    pub ui: UiConfig,

    /// Weather service endpoints and request settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Local image assets
    #[serde(default)]
    pub assets: AssetsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Window title
    pub window_title: String,

    /// Window width
    pub window_width: u32,

    /// Window height
    pub window_height: u32,

    /// Whether the temperature chart is shown on startup
    #[serde(default = "default_show_chart")]
    pub show_chart: bool,
}

fn default_show_chart() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            window_title: "Real-Time Weather App".to_string(),
            window_width: 1280,
            window_height: 720,
            show_chart: default_show_chart(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// IP geolocation endpoint
    pub location_url: String,

    /// Current conditions endpoint (OpenWeather compatible)
    pub current_url: String,

    /// Daily forecast endpoint (Open-Meteo compatible)
    pub forecast_url: String,

    /// API key for the current conditions endpoint.
    /// Falls back to `NIMBUS_OPENWEATHER_API_KEY` when empty.
    #[serde(default)]
    pub api_key: String,

    /// Number of forecast days requested
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u8,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_forecast_days() -> u8 {
    7
}

fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            location_url: "http://ip-api.com/json".to_string(),
            current_url: "https://api.openweathermap.org/data/2.5/weather".to_string(),
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            api_key: String::new(),
            forecast_days: default_forecast_days(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl WeatherConfig {
    /// The configured API key, or the environment override when none is set
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.trim().to_string());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetsConfig {
    /// Background used when no condition background is available
    pub default_background: PathBuf,

    /// Directory holding per-condition background images
    pub backgrounds_dir: PathBuf,

    /// Directory holding per-condition animated icons
    pub icons_dir: PathBuf,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            default_background: PathBuf::from("bgimg.png"),
            backgrounds_dir: PathBuf::from("weather_backgrounds"),
            icons_dir: PathBuf::from("icons"),
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, creating default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            return Ok(config);
        }

        let contents = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Io {
            path: config_path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: config_path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        Self::load()?.checked()
    }

    fn checked(self) -> Result<(Self, ValidationResult)> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((self, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.location_url, "weather.location_url", &mut result);
        self.validate_url(&self.weather.current_url, "weather.current_url", &mut result);
        self.validate_url(&self.weather.forecast_url, "weather.forecast_url", &mut result);

        // Validate window dimensions
        if self.ui.window_width == 0 {
            result.add_error("ui.window_width", "Window width must be greater than 0");
        } else if self.ui.window_width > 10000 {
            result.add_warning("ui.window_width", "Window width is unusually large (>10000)");
        }

        if self.ui.window_height == 0 {
            result.add_error("ui.window_height", "Window height must be greater than 0");
        } else if self.ui.window_height > 10000 {
            result.add_warning("ui.window_height", "Window height is unusually large (>10000)");
        }

        // Open-Meteo serves at most 16 days
        if self.weather.forecast_days == 0 || self.weather.forecast_days > 16 {
            result.add_error(
                "weather.forecast_days",
                format!(
                    "Forecast days must be between 1 and 16, got {}",
                    self.weather.forecast_days
                ),
            );
        } else if self.weather.forecast_days != 7 {
            result.add_warning(
                "weather.forecast_days",
                "The forecast strip is laid out for 7 days",
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error(
                "weather.request_timeout_secs",
                "Request timeout must be greater than 0",
            );
        }

        if self.weather.resolved_api_key().is_none() {
            result.add_warning(
                "weather.api_key",
                format!(
                    "No API key configured (set weather.api_key or {}) - current conditions will be unavailable",
                    API_KEY_ENV
                ),
            );
        }

        // Missing assets are recoverable, so only warn
        if !self.assets.default_background.exists() {
            result.add_warning(
                "assets.default_background",
                format!(
                    "File does not exist: {}",
                    self.assets.default_background.display()
                ),
            );
        }
        for (field, dir) in [
            ("assets.backgrounds_dir", &self.assets.backgrounds_dir),
            ("assets.icons_dir", &self.assets.icons_dir),
        ] {
            if !dir.is_dir() {
                result.add_warning(
                    field,
                    format!("Directory does not exist: {}", dir.display()),
                );
            }
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                // Check scheme
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                // Check host
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(
                    field_name,
                    format!("Invalid URL: {}", e),
                );
            }
        }
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let io_error = |source| ConfigError::Io {
            path: config_path.to_path_buf(),
            source,
        };

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(config_path, contents).map_err(io_error)
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NoConfigDir)?
            .join("nimbus");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_default_endpoints_and_forecast_days() {
        let config = Config::default();
        assert_eq!(config.weather.location_url, "http://ip-api.com/json");
        assert_eq!(config.weather.forecast_days, 7);
        assert_eq!(config.ui.window_width, 1280);
        assert_eq!(config.ui.window_height, 720);
        assert!(config.ui.show_chart);
    }

    #[test]
    fn test_invalid_url() {
        let mut config = Config::default();
        config.weather.forecast_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "weather.forecast_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.weather.location_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_window_dimensions() {
        let mut config = Config::default();
        config.ui.window_width = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "ui.window_width"));
    }

    #[test]
    fn test_forecast_days_bounds() {
        let mut config = Config::default();
        config.weather.forecast_days = 0;
        assert!(!config.validate().is_valid());

        config.weather.forecast_days = 17;
        assert!(!config.validate().is_valid());

        config.weather.forecast_days = 5;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "weather.forecast_days"));
    }

    #[test]
    fn test_configured_api_key_wins_over_environment() {
        let mut config = Config::default();
        config.weather.api_key = "  abc123  ".to_string();
        assert_eq!(config.weather.resolved_api_key().as_deref(), Some("abc123"));
        assert!(!config
            .validate()
            .warnings
            .iter()
            .any(|w| w.field == "weather.api_key"));
    }

    #[test]
    fn test_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        // First load writes the defaults
        let created = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created.ui.window_title, "Real-Time Weather App");

        let mut edited = created.clone();
        edited.ui.show_chart = false;
        edited.weather.api_key = "key".to_string();
        edited.save_to(&path).unwrap();

        let reloaded = Config::load_from(&path).unwrap();
        assert!(!reloaded.ui.show_chart);
        assert_eq!(reloaded.weather.api_key, "key");
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui]\nwindow_title = \"Weather\"\nwindow_width = 800\nwindow_height = 600\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.ui.window_title, "Weather");
        assert!(config.ui.show_chart);
        assert_eq!(config.weather.forecast_days, 7);
        assert_eq!(config.assets.icons_dir, PathBuf::from("icons"));
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ui\nwindow_title = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: ref p, .. } if p == &path));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_startup() {
        let mut config = Config::default();
        config.ui.window_height = 0;

        let err = config.checked().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref summary) if summary.contains("ui.window_height")));
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
