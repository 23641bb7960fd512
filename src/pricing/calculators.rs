//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no network access. Anomalies never
//! error out: they produce a zero price plus a flag the caller can surface.

use rust_decimal::Decimal;
use serde::Serialize;

use super::models::{
    ActivityPricing, HotelPricing, ItemPricing, ParticipantBounds, PricingModel, PER_PERSON_UNIT,
};
use super::money::Price;

/// Result of hotel pricing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelPriceResult {
    #[serde(flatten)]
    pub price: Price,
    pub pricing_model: PricingModel,
    pub calculated_for: u32,
    pub exceeds_max_people: bool,
    pub pricing_not_visible: bool,
}

/// Calculate the price of a hotel stay for a group.
///
/// Groups larger than `max_overnight_people` are priced for the maximum and
/// flagged. Group pricing covers up to `group_people_count`; people beyond it
/// are billed per person.
pub fn calculate_hotel_price(
    pricing: &HotelPricing,
    max_overnight_people: Option<u32>,
    participant_count: u32,
) -> HotelPriceResult {
    if !pricing.pricing_visible {
        return HotelPriceResult {
            price: Price::ZERO,
            pricing_model: PricingModel::Individual,
            calculated_for: participant_count,
            exceeds_max_people: false,
            pricing_not_visible: true,
        };
    }

    let (count, exceeds_max_people) = match max_overnight_people {
        Some(max) if participant_count > max => (max, true),
        _ => (participant_count, false),
    };

    let price_per_person = pricing.price_per_person.unwrap_or(Decimal::ZERO);

    let (netto, pricing_model) = match (pricing.has_fixed_group_price, pricing.group_price) {
        (true, Some(group_price)) => {
            let included = pricing.group_people_count.unwrap_or(0);
            let excess = count.saturating_sub(included);
            (
                group_price + Decimal::from(excess) * price_per_person,
                PricingModel::Threshold,
            )
        }
        _ => (Decimal::from(count) * price_per_person, PricingModel::PerUnit),
    };

    HotelPriceResult {
        price: Price::from_netto(netto),
        pricing_model,
        calculated_for: count,
        exceeds_max_people,
        pricing_not_visible: false,
    }
}

/// Result of activity pricing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityPriceResult {
    #[serde(flatten)]
    pub price: Price,
    pub calculated_for: u32,
    pub below_min_people: bool,
    pub exceeds_max_people: bool,
    /// Base pricing was missing; the activity is priced at zero.
    pub pricing_missing: bool,
}

/// Calculate the price of an activity.
///
/// The participant count is clamped into `bounds` first. `base_price` covers
/// up to `max_participants`; everyone beyond is billed at
/// `additional_person_price`.
pub fn calculate_activity_price(
    pricing: Option<&ActivityPricing>,
    bounds: Option<&ParticipantBounds>,
    participant_count: u32,
) -> ActivityPriceResult {
    let mut count = participant_count;
    let mut below_min_people = false;
    let mut exceeds_max_people = false;

    if let Some(bounds) = bounds {
        if let Some(min) = bounds.min {
            if count < min {
                count = min;
                below_min_people = true;
            }
        }
        if let Some(max) = bounds.max {
            if count > max {
                count = max;
                exceeds_max_people = true;
            }
        }
    }

    let valid = pricing.filter(|p| matches!(p.base_price, Some(base) if base >= Decimal::ZERO));
    let Some(pricing) = valid else {
        return ActivityPriceResult {
            price: Price::ZERO,
            calculated_for: count,
            below_min_people,
            exceeds_max_people,
            pricing_missing: true,
        };
    };

    let base_price = pricing.base_price.unwrap_or_default();
    let included = pricing.max_participants.unwrap_or(u32::MAX);
    let additional = pricing.additional_person_price.unwrap_or(Decimal::ZERO);

    let netto = if count <= included {
        base_price
    } else {
        base_price + Decimal::from(count - included) * additional
    };

    ActivityPriceResult {
        price: Price::from_netto(netto),
        calculated_for: count,
        below_min_people,
        exceeds_max_people,
        pricing_missing: false,
    }
}

/// Result of addon / extra pricing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPriceResult {
    #[serde(flatten)]
    pub price: Price,
    pub pricing_model: PricingModel,
    /// Billed units (per-unit and threshold models).
    pub units: u32,
    /// Price must be quoted manually.
    pub requires_individual_quote: bool,
}

/// Calculate the price of an addon or cart-level extra.
///
/// `count` is the quantity the customer picked; it only matters for per-unit
/// pricing with `has_count` set.
pub fn calculate_item_price(
    pricing: &ItemPricing,
    count: Option<u32>,
    participant_count: u32,
) -> ItemPriceResult {
    let (netto, units) = match pricing {
        ItemPricing::Fixed { fixed_price } => (*fixed_price, 1),
        ItemPricing::PerUnit {
            unit_price,
            unit_label,
            has_count,
        } => {
            let mut units = if *has_count { count.unwrap_or(1) } else { 1 };
            if unit_label.as_deref() == Some(PER_PERSON_UNIT) {
                units = units.saturating_mul(participant_count);
            }
            (*unit_price * Decimal::from(units), units)
        }
        ItemPricing::Threshold {
            base_price,
            max_units,
            additional_price,
        } => {
            let excess = participant_count.saturating_sub(*max_units);
            (
                *base_price + Decimal::from(excess) * *additional_price,
                participant_count,
            )
        }
        ItemPricing::Individual => (Decimal::ZERO, 0),
    };

    ItemPriceResult {
        price: Price::from_netto(netto),
        pricing_model: pricing.kind(),
        units,
        requires_individual_quote: matches!(pricing, ItemPricing::Individual),
    }
}
