//! Request DTOs for the quote endpoint.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::cms::queries::ActivityLocation;
use crate::geo::Address;
use crate::pricing::{
    ActivityPricing, GastronomySelection, HotelGastronomy, HotelPricing, ItemPricing,
    ParticipantBounds, TRANSPORT_EXTRA_ID,
};

/// Cart posted by the quote form
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub participant_count: u32,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub selected_dates: Vec<SelectedDate>,
    #[serde(default)]
    pub hotels: Vec<SelectedHotel>,
    #[serde(default)]
    pub activities: Vec<SelectedActivity>,
    #[serde(default)]
    pub extras: Vec<SelectedExtra>,
    #[serde(default)]
    pub activity_address: Option<Address>,
    #[serde(default)]
    pub gastronomy: Vec<GastronomySelection>,
}

fn default_language() -> String {
    "pl".to_string()
}

impl QuoteRequest {
    /// The reserved transport extra, if transport was requested.
    pub fn transport_extra(&self) -> Option<&SelectedExtra> {
        self.extras.iter().find(|e| e.is_transport())
    }

    /// Extras priced generically (everything but transport).
    pub fn priced_extras(&self) -> impl Iterator<Item = &SelectedExtra> {
        self.extras.iter().filter(|e| !e.is_transport())
    }
}

/// A single day or a range, as the date picker sends them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SelectedDate {
    Single(String),
    #[serde(rename_all = "camelCase")]
    Range {
        start_date: String,
        #[serde(default)]
        end_date: Option<String>,
    },
}

/// Normalize a date input to `YYYY-MM-DD`. Accepts plain dates and RFC 3339
/// timestamps; anything else is `None`.
pub fn normalize_date(input: &str) -> Option<String> {
    let input = input.trim();
    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date.format("%Y-%m-%d").to_string());
    }
    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedHotel {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pricing: HotelPricing,
    #[serde(default)]
    pub max_overnight_people: Option<u32>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub addons: Vec<SelectedAddon>,
    #[serde(default)]
    pub gastronomy: Option<HotelGastronomy>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedActivity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pricing: Option<ActivityPricing>,
    #[serde(default)]
    pub participants: Option<ParticipantBounds>,
    /// Looked up from the CMS when absent.
    #[serde(default)]
    pub location: Option<ActivityLocation>,
    #[serde(default)]
    pub addons: Vec<SelectedAddon>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedAddon {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub pricing: Option<ItemPricing>,
    #[serde(default)]
    pub count: Option<u32>,
}

/// Cart-level extra. The `transport` extra carries the pickup address.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedExtra {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pricing: Option<ItemPricing>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub people_per_bus: Option<u32>,
}

impl SelectedExtra {
    pub fn is_transport(&self) -> bool {
        self.id == TRANSPORT_EXTRA_ID
    }
}
