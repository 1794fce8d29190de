//! OpenWeatherMap current-weather client.
//!
//! Fetches the current wind speed at a coordinate from the OpenWeatherMap
//! "current weather data" endpoint.
//! See: https://openweathermap.org/current

use serde::Deserialize;
use std::future::Future;
use std::time::Duration;

use crate::errors::AppError;

pub const OPENWEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Something that can report the current wind speed at a coordinate.
///
/// Implementations must not fail past this boundary: every problem (network,
/// parsing, credentials, bad coordinates) surfaces as `None`.
pub trait WindSpeedLookup {
    fn lookup(&self, latitude: f64, longitude: f64) -> impl Future<Output = Option<f64>> + Send;
}

/// Client for the OpenWeatherMap current-weather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

// --- OpenWeatherMap JSON response types (only what we read) ---

#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    wind: Option<Wind>,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: Option<f64>,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Fetch the current wind speed (m/s) for a location.
    pub async fn fetch_wind_speed(&self, lat: f64, lon: f64) -> Result<f64, AppError> {
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(AppError::InternalError(format!(
                "Coordinates out of range: ({}, {})",
                lat, lon
            )));
        }

        let lat_str = lat.to_string();
        let lon_str = lon.to_string();

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", lat_str.as_str()),
                ("lon", lon_str.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("OpenWeatherMap request failed: {}", e))
            })?;

        if !response.status().is_success() {
            return Err(AppError::ExternalServiceError(format!(
                "OpenWeatherMap returned HTTP {}",
                response.status()
            )));
        }

        let body: CurrentWeatherResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("OpenWeatherMap JSON parse error: {}", e))
        })?;

        extract_wind_speed(&body)
    }
}

fn extract_wind_speed(body: &CurrentWeatherResponse) -> Result<f64, AppError> {
    let speed = body
        .wind
        .as_ref()
        .and_then(|w| w.speed)
        .ok_or_else(|| {
            AppError::ExternalServiceError("Wind data not found in weather response".to_string())
        })?;

    if !speed.is_finite() {
        return Err(AppError::ExternalServiceError(format!(
            "Non-finite wind speed in weather response: {}",
            speed
        )));
    }
    Ok(speed)
}

impl WindSpeedLookup for OpenWeatherClient {
    async fn lookup(&self, latitude: f64, longitude: f64) -> Option<f64> {
        match self.fetch_wind_speed(latitude, longitude).await {
            Ok(speed) => {
                tracing::debug!(
                    "Wind speed for ({}, {}): {} m/s",
                    latitude,
                    longitude,
                    speed
                );
                Some(speed)
            }
            Err(e) => {
                tracing::warn!(
                    "Wind speed lookup failed for ({}, {}): {}",
                    latitude,
                    longitude,
                    e
                );
                None
            }
        }
    }
}
