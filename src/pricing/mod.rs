//! Pricing engine module.
//!
//! Pure calculators for every priced entity of a quote: hotels, activities,
//! addons and extras, gastronomy, and transport legs. Every calculator
//! returns netto and brutto (`round(netto × 1.23)`).

pub mod calculators;
pub mod gastronomy;
pub mod models;
pub mod money;
pub mod transport;

// Re-export commonly used items
pub use calculators::{
    calculate_activity_price, calculate_hotel_price, calculate_item_price, ActivityPriceResult,
    HotelPriceResult, ItemPriceResult,
};
pub use gastronomy::{
    calculate_gastronomy, GastronomyPriceResult, GastronomySelection, HotelGastronomy,
};
pub use models::{
    ActivityPricing, HotelPricing, ItemPricing, ParticipantBounds, PricingModel,
};
pub use money::{round_money, to_brutto, Price, VAT_MULTIPLIER};
pub use transport::{
    plan_buses, resolve_leg, transport_price, BusPlan, Destination, TransportOutcome,
    TransportQuote, TransportSettings, TRANSPORT_EXTRA_ID,
};
