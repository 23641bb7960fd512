//! Geocoding and distance helpers for transport pricing.

pub mod distance;
pub mod geocoder;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use distance::{distance_km, haversine_km, Coordinates};
pub use geocoder::{CachedGeocoder, GeocodeError, Geocoder, NominatimGeocoder, ReverseAddress};

/// Free-text address, optionally already pinned on the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Address {
    /// Coordinates supplied by the map picker, if usable.
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)).filter(|c| c.is_valid()),
            _ => None,
        }
    }

    /// "street, postal code city" with blanks skipped.
    pub fn query(&self) -> String {
        let street = self.street.as_deref().map(str::trim).unwrap_or("");
        let locality = [self.postal_code.as_deref(), self.city.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        [street, locality.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates().is_none() && self.query().is_empty()
    }
}

/// Outcome of turning an optional address into coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Located {
    /// No address was given.
    Missing,
    /// An address was given but could not be geocoded.
    NotFound,
    Found(Coordinates),
}

/// Resolve an address: map coordinates win, otherwise geocode the text.
/// Geocoding errors degrade to `NotFound`.
pub async fn locate(geocoder: &dyn Geocoder, address: Option<&Address>) -> Located {
    let Some(address) = address.filter(|a| !a.is_empty()) else {
        return Located::Missing;
    };

    if let Some(coords) = address.coordinates() {
        return Located::Found(coords);
    }

    let query = address.query();
    match geocoder.search(&query).await {
        Ok(Some(coords)) => Located::Found(coords),
        Ok(None) => {
            warn!("No geocoding result for address: {}", query);
            Located::NotFound
        }
        Err(e) => {
            warn!("Geocoding failed for address '{}': {}", query, e);
            Located::NotFound
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct FixedGeocoder(Result<Option<Coordinates>, ()>);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn search(&self, _query: &str) -> Result<Option<Coordinates>, GeocodeError> {
            self.0
                .map_err(|_| GeocodeError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        }

        async fn reverse(&self, _coords: Coordinates) -> Result<Option<ReverseAddress>, GeocodeError> {
            Ok(None)
        }
    }

    fn address(street: &str, postal: &str, city: &str) -> Address {
        Address {
            street: Some(street.to_string()),
            postal_code: Some(postal.to_string()),
            city: Some(city.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_address_query() {
        assert_eq!(
            address("Marszałkowska 1", "00-001", "Warszawa").query(),
            "Marszałkowska 1, 00-001 Warszawa"
        );
        let city_only = Address {
            city: Some("Kraków".to_string()),
            ..Default::default()
        };
        assert_eq!(city_only.query(), "Kraków");
        assert!(Address::default().is_empty());
    }

    #[test]
    fn test_address_coordinates_need_both_axes() {
        let half = Address {
            lat: Some(52.0),
            ..Default::default()
        };
        assert_eq!(half.coordinates(), None);
    }

    #[tokio::test]
    async fn test_locate_prefers_map_coordinates() {
        let geocoder = FixedGeocoder(Err(()));
        let pinned = Address {
            lat: Some(52.0),
            lng: Some(21.0),
            ..Default::default()
        };
        assert_eq!(
            locate(&geocoder, Some(&pinned)).await,
            Located::Found(Coordinates::new(52.0, 21.0))
        );
    }

    #[tokio::test]
    async fn test_locate_missing_and_failures() {
        let failing = FixedGeocoder(Err(()));
        assert_eq!(locate(&failing, None).await, Located::Missing);
        assert_eq!(locate(&failing, Some(&Address::default())).await, Located::Missing);
        assert_eq!(
            locate(&failing, Some(&address("a", "b", "c"))).await,
            Located::NotFound
        );

        let empty = FixedGeocoder(Ok(None));
        assert_eq!(
            locate(&empty, Some(&address("a", "b", "c"))).await,
            Located::NotFound
        );
    }
}
