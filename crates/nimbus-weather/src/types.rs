use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Weather codes served by the forecast endpoint and their short labels.
/// See: https://open-meteo.com/en/docs#weathervariables
pub static CONDITION_CODES: &[(i32, &str)] = &[
    (0, "Clear"),
    (1, "Mainly clear"),
    (2, "Partly cloudy"),
    (3, "Overcast"),
    (45, "Fog"),
    (48, "Rime fog"),
    (51, "Drizzle"),
    (61, "Rain"),
    (71, "Snow"),
    (80, "Rain showers"),
    (85, "Snow showers"),
    (95, "Thunderstorm"),
];

/// Label for codes missing from [`CONDITION_CODES`]
pub const UNKNOWN_CONDITION: &str = "Unknown";

/// Short English label for a forecast weather code
pub fn condition_label(code: i32) -> &'static str {
    CONDITION_CODES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .unwrap_or(UNKNOWN_CONDITION)
}

/// Rounds to whole degrees the way the forecast strip prints them
/// (never "-0").
pub fn whole_degrees(value: f64) -> String {
    let rounded = format!("{:.0}", value);
    if rounded == "-0" {
        "0".to_string()
    } else {
        rounded
    }
}

/// Geographic location resolved from the caller's public IP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub region: String,
}

impl Location {
    /// "City, Region"
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.city, self.region)
    }
}

/// Current weather conditions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// Free-text category such as "Clouds" or "Rain"
    pub condition_main: String,
    pub description: String,
    pub temperature_celsius: f64,
}

impl CurrentConditions {
    /// Description with the first letter upper-cased and the rest lower-cased
    pub fn display_description(&self) -> String {
        let mut chars = self.description.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    /// Multi-line summary shown next to the condition icon, temperature as reported
    pub fn summary(&self, location: &Location) -> String {
        format!(
            "Location: {}\nWeather: {}\nTemperature: {}°C",
            location.display_name(),
            self.display_description(),
            self.temperature_celsius
        )
    }
}

/// Daily forecast entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub max_temp: f64,
    pub min_temp: f64,
    pub condition_code: i32,
}

impl ForecastDay {
    /// Abbreviated weekday, e.g. "Mon"
    pub fn day_label(&self) -> String {
        self.date.format("%a").to_string()
    }

    pub fn condition_label(&self) -> &'static str {
        condition_label(self.condition_code)
    }

    /// "12°C / 4°C"
    pub fn temperature_range(&self) -> String {
        format!(
            "{}°C / {}°C",
            whole_degrees(self.max_temp),
            whole_degrees(self.min_temp)
        )
    }
}

/// Ordered daily forecast built from index-aligned arrays
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Forecast {
    pub days: Vec<ForecastDay>,
}

impl Forecast {
    /// Zip the parallel daily arrays into forecast days.
    ///
    /// All four arrays must have the same length and contain no nulls,
    /// otherwise the payload is rejected as malformed.
    pub fn from_daily(
        dates: &[String],
        max_temps: &[Option<f64>],
        min_temps: &[Option<f64>],
        codes: &[Option<i32>],
    ) -> Result<Self, WeatherError> {
        let len = dates.len();
        if max_temps.len() != len || min_temps.len() != len || codes.len() != len {
            return Err(WeatherError::Parse(format!(
                "daily arrays have mismatched lengths (time={}, max={}, min={}, code={})",
                len,
                max_temps.len(),
                min_temps.len(),
                codes.len()
            )));
        }

        let mut days = Vec::with_capacity(len);
        for (i, raw_date) in dates.iter().enumerate() {
            let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
                .map_err(|e| WeatherError::Parse(format!("invalid date {:?}: {}", raw_date, e)))?;
            let missing = |field: &str| WeatherError::Parse(format!("{} missing for {}", field, raw_date));
            days.push(ForecastDay {
                date,
                max_temp: max_temps[i].ok_or_else(|| missing("temperature_2m_max"))?,
                min_temp: min_temps[i].ok_or_else(|| missing("temperature_2m_min"))?,
                condition_code: codes[i].ok_or_else(|| missing("weathercode"))?,
            });
        }

        Ok(Self { days })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn day_labels(&self) -> Vec<String> {
        self.days.iter().map(ForecastDay::day_label).collect()
    }

    pub fn max_temps(&self) -> Vec<f64> {
        self.days.iter().map(|d| d.max_temp).collect()
    }

    pub fn min_temps(&self) -> Vec<f64> {
        self.days.iter().map(|d| d.min_temp).collect()
    }
}

/// Step of the refresh cycle a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Location,
    Current,
    Forecast,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStage::Location => write!(f, "location"),
            FetchStage::Current => write!(f, "current weather"),
            FetchStage::Forecast => write!(f, "forecast"),
        }
    }
}

/// Weather provider errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{stage} service returned HTTP {status}")]
    Status { stage: FetchStage, status: u16 },
    #[error("Location error: {0}")]
    Location(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Configuration error: {0}")]
    Config(String),
}
