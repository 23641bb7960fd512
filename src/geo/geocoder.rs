//! Geocoding client (OpenStreetMap Nominatim) with result caching.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cache::AppCache;
use crate::config::GeocoderConfig;

use super::distance::Coordinates;

#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Geocoder returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Malformed coordinates in response: {0}")]
    Malformed(String),
}

/// Address components from a reverse lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReverseAddress {
    pub street: String,
    pub postal_code: String,
    pub city: String,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Forward lookup. `Ok(None)` means the service answered with no match.
    async fn search(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError>;

    async fn reverse(&self, coords: Coordinates) -> Result<Option<ReverseAddress>, GeocodeError>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    /// Parsed coordinates; unparseable, non-finite or out-of-range values
    /// are rejected.
    fn coordinates(&self) -> Result<Coordinates, GeocodeError> {
        let malformed = || GeocodeError::Malformed(format!("{},{}", self.lat, self.lon));
        let lat = self.lat.trim().parse::<f64>().map_err(|_| malformed())?;
        let lng = self.lon.trim().parse::<f64>().map_err(|_| malformed())?;

        Some(Coordinates::new(lat, lng))
            .filter(|c| c.is_valid())
            .ok_or_else(malformed)
    }
}

#[derive(Debug, Deserialize)]
struct NominatimReverse {
    #[serde(default)]
    address: Option<NominatimAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NominatimAddress {
    road: Option<String>,
    house_number: Option<String>,
    postcode: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
}

impl From<NominatimAddress> for ReverseAddress {
    fn from(a: NominatimAddress) -> Self {
        let street = match (a.road, a.house_number) {
            (Some(road), Some(number)) => format!("{} {}", road, number),
            (Some(road), None) => road,
            _ => String::new(),
        };
        Self {
            street,
            postal_code: a.postcode.unwrap_or_default(),
            city: a.city.or(a.town).or(a.village).unwrap_or_default(),
        }
    }
}

pub struct NominatimGeocoder {
    http: reqwest::Client,
    base_url: String,
    country_codes: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            country_codes: config.country_codes.clone(),
        })
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let response = self
            .http
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", "1"),
                ("countrycodes", self.country_codes.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let places: Vec<NominatimPlace> = response.json().await?;
        let Some(place) = places.into_iter().next() else {
            return Ok(None);
        };

        place.coordinates().map(Some)
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<ReverseAddress>, GeocodeError> {
        let response = self
            .http
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lng.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status()));
        }

        let body: NominatimReverse = response.json().await?;
        Ok(body.address.map(ReverseAddress::from))
    }
}

/// Geocoder decorator caching forward lookups, including misses.
pub struct CachedGeocoder {
    inner: Arc<dyn Geocoder>,
    cache: AppCache,
}

impl CachedGeocoder {
    pub fn new(inner: Arc<dyn Geocoder>, cache: AppCache) -> Self {
        Self { inner, cache }
    }
}

#[async_trait]
impl Geocoder for CachedGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        let key = AppCache::geocode_key(query);

        if let Some(coords) = self.cache.geocodes.get(&key).await {
            debug!("Geocode cache HIT: {}", key);
            return Ok(Some(coords));
        }
        if self.cache.geocode_misses.get(&key).await.is_some() {
            debug!("Geocode negative cache HIT: {}", key);
            return Ok(None);
        }

        // Errors are not cached; the next request retries upstream.
        let result = self.inner.search(query).await?;
        match result {
            Some(coords) => self.cache.geocodes.insert(key, coords).await,
            None => self.cache.geocode_misses.insert(key, ()).await,
        }
        Ok(result)
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<ReverseAddress>, GeocodeError> {
        self.inner.reverse(coords).await
    }
}
