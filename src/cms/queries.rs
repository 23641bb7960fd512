//! CMS reads used by the quote pipeline.

use std::collections::HashMap;

use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use crate::geo::Address;
use crate::pricing::TransportSettings;

use super::client::{CmsClient, CmsError};

const TRANSPORT_SETTINGS_QUERY: &str = r#"*[_type == "transportSettings"][0]{
  basePrice,
  pricePerKm,
  maxFreeKilometers,
  maxPeoplePerBus
}"#;

const ACTIVITY_LOCATION_QUERY: &str = r#"*[_type == "activity" && _id == $id][0].location{
  nationwide,
  address
}"#;

/// Transport settings as stored; any field may be unset.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransportSettingsDoc {
    pub base_price: Option<Decimal>,
    pub price_per_km: Option<Decimal>,
    pub max_free_kilometers: Option<u32>,
    pub max_people_per_bus: Option<u32>,
}

impl TransportSettingsDoc {
    /// Settings if every field is present.
    pub fn complete(&self) -> Option<TransportSettings> {
        Some(TransportSettings {
            base_price: self.base_price?,
            price_per_km: self.price_per_km?,
            max_free_kilometers: self.max_free_kilometers?,
            max_people_per_bus: self.max_people_per_bus?,
        })
    }

    /// Fill unset fields from `fallback`.
    pub fn merge_with(&self, fallback: &TransportSettings) -> TransportSettings {
        TransportSettings {
            base_price: self.base_price.unwrap_or(fallback.base_price),
            price_per_km: self.price_per_km.unwrap_or(fallback.price_per_km),
            max_free_kilometers: self
                .max_free_kilometers
                .unwrap_or(fallback.max_free_kilometers),
            max_people_per_bus: self
                .max_people_per_bus
                .filter(|n| *n > 0)
                .unwrap_or(fallback.max_people_per_bus),
        }
    }
}

/// Where an activity takes place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityLocation {
    /// Held anywhere in the country, at an address the customer chooses.
    pub nationwide: bool,
    pub address: Option<Address>,
}

pub async fn fetch_transport_settings(
    cms: &dyn CmsClient,
) -> Result<Option<TransportSettingsDoc>, CmsError> {
    let value = cms.fetch(TRANSPORT_SETTINGS_QUERY, json!({})).await?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| CmsError::UnexpectedResponse(e.to_string()))
}

pub async fn fetch_activity_location(
    cms: &dyn CmsClient,
    activity_id: &str,
) -> Result<Option<ActivityLocation>, CmsError> {
    let value = cms
        .fetch(ACTIVITY_LOCATION_QUERY, json!({ "id": activity_id }))
        .await?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|e| CmsError::UnexpectedResponse(e.to_string()))
}

/// Look up several activity locations concurrently. Failed or empty lookups
/// are logged and left out of the map.
pub async fn fetch_activity_locations(
    cms: &dyn CmsClient,
    activity_ids: &[String],
) -> HashMap<String, ActivityLocation> {
    let lookups = activity_ids
        .iter()
        .map(|id| async move { (id.clone(), fetch_activity_location(cms, id).await) });

    join_all(lookups)
        .await
        .into_iter()
        .filter_map(|(id, result)| match result {
            Ok(Some(location)) => Some((id, location)),
            Ok(None) => {
                warn!("Activity {} has no location in CMS", id);
                None
            }
            Err(e) => {
                warn!("Failed to fetch location for activity {}: {}", id, e);
                None
            }
        })
        .collect()
}
