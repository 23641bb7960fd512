//! Quote pricing service for the team-building website.
//!
//! Prices carts of hotels, activities, addons, gastronomy and transport,
//! and stores the resulting quote in the CMS.

pub mod cache;
pub mod cms;
pub mod config;
pub mod error;
pub mod geo;
pub mod pricing;
pub mod quotes;
pub mod routes;

use std::sync::Arc;

use cache::AppCache;
use cms::CmsClient;
use geo::{CachedGeocoder, Geocoder};
use pricing::TransportSettings;
use quotes::QuoteService;

pub use routes::router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub cms: Arc<dyn CmsClient>,
    pub geocoder: Arc<dyn Geocoder>,
    pub cache: AppCache,
    pub quotes: Arc<QuoteService>,
}

impl AppState {
    /// Wire the pipeline around the given collaborators. The geocoder is
    /// wrapped in the result cache.
    pub fn new(
        cms: Arc<dyn CmsClient>,
        geocoder: Arc<dyn Geocoder>,
        cache: AppCache,
        transport_fallback: TransportSettings,
    ) -> Self {
        let geocoder: Arc<dyn Geocoder> = Arc::new(CachedGeocoder::new(geocoder, cache.clone()));
        let quotes = Arc::new(QuoteService::new(
            cms.clone(),
            geocoder.clone(),
            cache.clone(),
            transport_fallback,
        ));

        Self {
            cms,
            geocoder,
            cache,
            quotes,
        }
    }
}
