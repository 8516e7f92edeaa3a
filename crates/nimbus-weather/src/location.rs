//! IP-based location lookup.
//!
//! Talks to an ip-api.com compatible endpoint, which answers with the caller's
//! approximate coordinates plus city and region names.

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{FetchStage, Location, WeatherError};

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    /// "success" or "fail"; absent on some compatible services
    status: Option<String>,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
    #[serde(rename = "regionName")]
    region_name: Option<String>,
}

impl IpApiResponse {
    fn into_location(self) -> Result<Location, WeatherError> {
        if self.status.as_deref() == Some("fail") {
            return Err(WeatherError::Location(
                self.message.unwrap_or_else(|| "lookup failed".to_string()),
            ));
        }

        let (latitude, longitude) = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                return Err(WeatherError::Parse(
                    "location response is missing lat/lon".to_string(),
                ))
            }
        };

        Ok(Location {
            latitude,
            longitude,
            city: self.city.unwrap_or_default(),
            region: self.region_name.unwrap_or_default(),
        })
    }
}

/// Resolves the caller's location from their public IP
#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Client,
    url: String,
}

impl LocationResolver {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Single lookup, no retry.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self) -> Result<Location, WeatherError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("Location lookup returned status {}", status);
            return Err(WeatherError::Status {
                stage: FetchStage::Location,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed: IpApiResponse = serde_json::from_str(&body)
            .map_err(|e| WeatherError::Parse(format!("location response: {}", e)))?;

        let location = parsed.into_location()?;
        tracing::info!(
            "Resolved location {} ({:.4}, {:.4})",
            location.display_name(),
            location.latitude,
            location.longitude
        );
        Ok(location)
    }
}
