//! Quote model and the response envelope of the quote endpoint.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::pricing::{
    ActivityPriceResult, GastronomyPriceResult, HotelPriceResult, ItemPriceResult, Price,
    TransportQuote,
};

use super::requests::SelectedDate;

/// A computed quote. Created once per request and never mutated after
/// being stored.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote_id: String,
    pub created_at: DateTime<Utc>,
    pub participant_count: u32,
    pub language: String,
    pub selected_dates: Vec<SelectedDate>,
    pub items: Vec<QuoteItem>,
    /// Brutto grand total
    pub total_price: Decimal,
    pub total_netto_price: Decimal,
}

/// Own price of the entity a quote item is built around.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "itemType", rename_all = "camelCase")]
pub enum EntityPrice {
    Hotel(HotelPriceResult),
    Activity(ActivityPriceResult),
}

impl EntityPrice {
    pub fn price(&self) -> Price {
        match self {
            EntityPrice::Hotel(result) => result.price,
            EntityPrice::Activity(result) => result.price,
        }
    }
}

/// Addon or extra line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedLine {
    pub id: String,
    pub name: String,
    pub count: Option<u32>,
    #[serde(flatten)]
    pub result: ItemPriceResult,
}

/// One hotel-or-activity bundle within a quote.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub entity: EntityPrice,
    pub addons: Vec<PricedLine>,
    pub gastronomy: Vec<GastronomyPriceResult>,
    pub transport: Option<TransportQuote>,
    pub extras: Vec<PricedLine>,
    /// Brutto total of the item
    pub total_price: Decimal,
    pub total_netto_price: Decimal,
}

impl QuoteItem {
    pub fn new(
        id: String,
        name: String,
        entity: EntityPrice,
        addons: Vec<PricedLine>,
        gastronomy: Vec<GastronomyPriceResult>,
        transport: Option<TransportQuote>,
        extras: Vec<PricedLine>,
    ) -> Self {
        let mut item = Self {
            id,
            name,
            entity,
            addons,
            gastronomy,
            transport,
            extras,
            total_price: Decimal::ZERO,
            total_netto_price: Decimal::ZERO,
        };
        let total = item.total();
        item.total_price = total.brutto;
        item.total_netto_price = total.netto;
        item
    }

    /// Entity + addons + gastronomy + transport + extras, netto and brutto
    /// summed independently.
    pub fn total(&self) -> Price {
        self.entity.price()
            + self.addons.iter().map(|l| l.result.price).sum::<Price>()
            + self.gastronomy.iter().map(|g| g.price).sum::<Price>()
            + self.transport.as_ref().map(|t| t.price).unwrap_or(Price::ZERO)
            + self.extras.iter().map(|l| l.result.price).sum::<Price>()
    }
}

/// Response body of `POST /api/quotes`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl QuoteResponse {
    pub fn saved(quote: Quote, sanity_id: String) -> Self {
        Self {
            success: true,
            quote_id: Some(quote.quote_id.clone()),
            quote: Some(quote),
            sanity_id: Some(sanity_id),
            error: None,
            error_details: None,
        }
    }

    /// Persistence failed; the computed quote is still returned.
    pub fn unsaved(quote: Quote, details: String) -> Self {
        Self {
            success: false,
            quote_id: Some(quote.quote_id.clone()),
            quote: Some(quote),
            sanity_id: None,
            error: Some("Failed to save quote".to_string()),
            error_details: Some(details),
        }
    }

    pub fn failed(error: &str) -> Self {
        Self {
            success: false,
            quote_id: None,
            quote: None,
            sanity_id: None,
            error: Some(error.to_string()),
            error_details: None,
        }
    }
}
