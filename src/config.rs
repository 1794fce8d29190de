use std::time::Duration;
use thiserror::Error;

use crate::services::weather::OPENWEATHER_API_URL;

/// Placeholder key shipped in sample configs; never a real credential.
const PLACEHOLDER_API_KEY: &str = "your_api_key_here";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{var} is invalid: {message}")]
    Invalid { var: &'static str, message: String },
    #[error("OPENWEATHER_API_KEY still has the placeholder value; set a real OpenWeather API key")]
    PlaceholderApiKey,
}

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openweather_api_key: String,
    pub openweather_url: String,
    /// CSV registry of wind farms.
    pub data_file: String,
    pub port: u16,
    pub lookup_timeout: Duration,
    /// Maximum weather lookups in flight during one dashboard build.
    pub lookup_concurrency: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Parse configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openweather_api_key = var("OPENWEATHER_API_KEY")
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::Missing("OPENWEATHER_API_KEY"))?;
        if openweather_api_key == PLACEHOLDER_API_KEY {
            return Err(ConfigError::PlaceholderApiKey);
        }

        let lookup_timeout_secs: u64 = parse_or("LOOKUP_TIMEOUT_SECS", var("LOOKUP_TIMEOUT_SECS"), 10)?;
        let lookup_concurrency: usize = parse_or("LOOKUP_CONCURRENCY", var("LOOKUP_CONCURRENCY"), 4)?;
        if lookup_concurrency == 0 {
            return Err(ConfigError::Invalid {
                var: "LOOKUP_CONCURRENCY",
                message: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            openweather_api_key,
            openweather_url: var("OPENWEATHER_URL")
                .unwrap_or_else(|| OPENWEATHER_API_URL.to_string()),
            data_file: var("DATA_FILE").unwrap_or_else(|| "./data/windfarms.csv".to_string()),
            port: parse_or("PORT", var("PORT"), 8080)?,
            lookup_timeout: Duration::from_secs(lookup_timeout_secs),
            lookup_concurrency,
        })
    }
}

fn parse_or<T>(name: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var: name,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
