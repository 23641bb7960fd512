//! Service configuration loaded from the environment (and `.env`).

use std::env;

use rust_decimal::Decimal;

use crate::pricing::TransportSettings;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cms: CmsConfig,
    pub geocoder: GeocoderConfig,
    /// Used when the CMS transport settings cannot be read.
    pub transport_fallback: TransportSettings,
}

#[derive(Debug, Clone)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub user_agent: String,
    pub country_codes: String,
}

impl Config {
    /// Load configuration. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_or("PORT", 3000)?,
            cms: CmsConfig {
                project_id: env::var("SANITY_PROJECT_ID")
                    .map_err(|_| ConfigError::Missing("SANITY_PROJECT_ID"))?,
                dataset: var_or("SANITY_DATASET", "production"),
                api_version: var_or("SANITY_API_VERSION", "2024-01-01"),
                token: env::var("SANITY_API_TOKEN").ok().filter(|t| !t.is_empty()),
            },
            geocoder: GeocoderConfig {
                base_url: var_or("GEOCODER_BASE_URL", "https://nominatim.openstreetmap.org"),
                user_agent: var_or("GEOCODER_USER_AGENT", "eventquote-web/0.1"),
                country_codes: var_or("GEOCODER_COUNTRY_CODES", "pl"),
            },
            transport_fallback: TransportSettings {
                base_price: parse_or("TRANSPORT_BASE_PRICE", Decimal::from(1500))?,
                price_per_km: parse_or("TRANSPORT_PRICE_PER_KM", Decimal::from(8))?,
                max_free_kilometers: parse_or("TRANSPORT_MAX_FREE_KM", 50)?,
                max_people_per_bus: parse_or("TRANSPORT_MAX_PEOPLE_PER_BUS", 50)?,
            },
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
