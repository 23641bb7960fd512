//! In-memory caching using moka
//!
//! Geocoding answers are stable, so they are kept for a day. Misses are kept
//! briefly so a typo does not hammer the geocoder. Transport settings come
//! from the CMS and are refreshed in the background.

use moka::future::Cache;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::cms::{self, CmsClient};
use crate::geo::Coordinates;
use crate::pricing::TransportSettings;

const TRANSPORT_SETTINGS_KEY: &str = "transport";

/// Application cache shared by all requests
#[derive(Clone)]
pub struct AppCache {
    /// Forward geocoding hits (normalized query -> coordinates)
    pub geocodes: Cache<String, Coordinates>,
    /// Forward geocoding misses (normalized query)
    pub geocode_misses: Cache<String, ()>,
    /// Transport settings document (singleton)
    pub transport_settings: Cache<String, Arc<TransportSettings>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Geocodes: 5000 entries, 24h TTL
            geocodes: Cache::builder()
                .max_capacity(5000)
                .time_to_live(Duration::from_secs(24 * 60 * 60))
                .build(),

            // Misses: 1000 entries, 10 min TTL
            geocode_misses: Cache::builder()
                .max_capacity(1000)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),

            // Transport settings: 1 entry, 10 min TTL
            transport_settings: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            geocodes_size: self.geocodes.entry_count(),
            geocode_misses_size: self.geocode_misses.entry_count(),
            transport_settings_cached: self.transport_settings.entry_count() > 0,
        }
    }

    /// Normalized cache key for a geocoding query
    pub fn geocode_key(query: &str) -> String {
        query
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub async fn cached_transport_settings(&self) -> Option<Arc<TransportSettings>> {
        self.transport_settings.get(TRANSPORT_SETTINGS_KEY).await
    }

    pub async fn store_transport_settings(&self, settings: TransportSettings) {
        self.transport_settings
            .insert(TRANSPORT_SETTINGS_KEY.to_string(), Arc::new(settings))
            .await;
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub geocodes_size: u64,
    pub geocode_misses_size: u64,
    pub transport_settings_cached: bool,
}

/// Start background settings refresher
///
/// Loads transport settings on startup and refreshes them every 5 minutes,
/// ahead of the cache TTL. Unset fields are filled from `fallback`, the same
/// way request-time reads fill them.
pub async fn start_settings_refresher(
    cache: AppCache,
    cms: Arc<dyn CmsClient>,
    fallback: TransportSettings,
) {
    let mut interval = interval(Duration::from_secs(5 * 60));
    loop {
        interval.tick().await;
        refresh_settings(&cache, cms.as_ref(), &fallback).await;
    }
}

async fn refresh_settings(cache: &AppCache, cms: &dyn CmsClient, fallback: &TransportSettings) {
    match cms::queries::fetch_transport_settings(cms).await {
        Ok(Some(doc)) => {
            cache.store_transport_settings(doc.merge_with(fallback)).await;
            info!("Transport settings refreshed from CMS");
        }
        Ok(None) => warn!("No transport settings document in CMS"),
        Err(e) => warn!("Failed to refresh transport settings: {}", e),
    }
}
