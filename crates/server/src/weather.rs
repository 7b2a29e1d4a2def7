//! Open-Meteo current conditions (no API key required)

use medsupply_core::{ProviderError, WeatherSnapshot};
use serde::Deserialize;
use serde_json::Number;

use crate::config::Config;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";

#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentReadings>,
}

/// Readings stay as JSON numbers so they print exactly as Open-Meteo sent them
#[derive(Debug, Deserialize)]
struct CurrentReadings {
    temperature_2m: Option<Number>,
    relative_humidity_2m: Option<Number>,
    weather_code: Option<Number>,
    wind_speed_10m: Option<Number>,
}

impl WeatherClient {
    pub fn new(config: &Config, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: config.endpoints.open_meteo.clone(),
        }
    }

    /// Current weather at a coordinate, or `None` if it cannot be fetched.
    pub async fn fetch(&self, lat: f64, lon: f64) -> Option<WeatherSnapshot> {
        match self.try_fetch(lat, lon).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                tracing::warn!(lat, lon, error = %e, "Weather fetch failed");
                None
            }
        }
    }

    async fn try_fetch(&self, lat: f64, lon: f64) -> Result<WeatherSnapshot, ProviderError> {
        let response = self
            .http
            .get(format!("{}/v1/forecast", self.base_url))
            .query(&[
                ("latitude", lat.to_string()),
                ("longitude", lon.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::transport(format!("Open-Meteo request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ProviderError::transport(format!(
                "Open-Meteo returned status {}",
                response.status()
            )));
        }

        let body = response
            .json::<ForecastResponse>()
            .await
            .map_err(|e| ProviderError::parse(format!("Open-Meteo response: {e}")))?;

        let current = body
            .current
            .ok_or_else(|| ProviderError::empty("no current block"))?;
        snapshot_from(current)
    }
}

/// All four readings must be present; no partial snapshots.
fn snapshot_from(current: CurrentReadings) -> Result<WeatherSnapshot, ProviderError> {
    let (Some(temperature), Some(humidity), Some(code), Some(wind)) = (
        current.temperature_2m,
        current.relative_humidity_2m,
        current.weather_code,
        current.wind_speed_10m,
    ) else {
        return Err(ProviderError::empty("incomplete current readings"));
    };

    let code = code
        .as_i64()
        .or_else(|| code.as_f64().map(|c| c as i64))
        .ok_or_else(|| ProviderError::parse("weather_code is not numeric"))?;

    Ok(WeatherSnapshot::from_readings(temperature, humidity, code, wind))
}
