//! Pricing configuration models.
//!
//! These mirror the pricing objects stored on CMS documents (hotels,
//! activities, addons, extras) as the front end posts them back to us.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Unit label that multiplies per-unit pricing by the participant count.
pub const PER_PERSON_UNIT: &str = "osoba";

/// Pricing for addons and cart-level extras, discriminated by `pricingModel`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "pricingModel", rename_all = "snake_case")]
pub enum ItemPricing {
    #[serde(rename_all = "camelCase")]
    Fixed { fixed_price: Decimal },

    #[serde(rename_all = "camelCase")]
    PerUnit {
        unit_price: Decimal,
        #[serde(default)]
        unit_label: Option<String>,
        #[serde(default)]
        has_count: bool,
    },

    #[serde(rename_all = "camelCase")]
    Threshold {
        base_price: Decimal,
        max_units: u32,
        additional_price: Decimal,
    },

    Individual,
}

impl ItemPricing {
    pub fn kind(&self) -> PricingModel {
        match self {
            ItemPricing::Fixed { .. } => PricingModel::Fixed,
            ItemPricing::PerUnit { .. } => PricingModel::PerUnit,
            ItemPricing::Threshold { .. } => PricingModel::Threshold,
            ItemPricing::Individual => PricingModel::Individual,
        }
    }
}

/// Pricing model label reported alongside computed prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    Fixed,
    PerUnit,
    Threshold,
    Individual,
}

/// Hotel pricing block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelPricing {
    pub pricing_visible: bool,
    pub has_fixed_group_price: bool,
    pub group_price: Option<Decimal>,
    pub group_people_count: Option<u32>,
    pub price_per_person: Option<Decimal>,
}

/// Activity base pricing. Every field is optional on the wire; an activity
/// without a base price is priced at zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityPricing {
    pub base_price: Option<Decimal>,
    pub max_participants: Option<u32>,
    pub additional_person_price: Option<Decimal>,
}

/// Participant bounds an activity can be booked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticipantBounds {
    pub min: Option<u32>,
    pub max: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_item_pricing_fixed_from_json() {
        let pricing: ItemPricing =
            serde_json::from_value(json!({"pricingModel": "fixed", "fixedPrice": 300})).unwrap();
        assert_eq!(pricing, ItemPricing::Fixed { fixed_price: dec!(300) });
        assert_eq!(pricing.kind(), PricingModel::Fixed);
    }

    #[test]
    fn test_item_pricing_per_unit_defaults() {
        let pricing: ItemPricing =
            serde_json::from_value(json!({"pricingModel": "per_unit", "unitPrice": 25})).unwrap();
        assert_eq!(
            pricing,
            ItemPricing::PerUnit {
                unit_price: dec!(25),
                unit_label: None,
                has_count: false,
            }
        );
    }

    #[test]
    fn test_item_pricing_threshold_from_json() {
        let pricing: ItemPricing = serde_json::from_value(json!({
            "pricingModel": "threshold",
            "basePrice": 1000,
            "maxUnits": 20,
            "additionalPrice": 40
        }))
        .unwrap();
        assert_eq!(pricing.kind(), PricingModel::Threshold);
    }

    #[test]
    fn test_item_pricing_individual_ignores_extra_fields() {
        let pricing: ItemPricing =
            serde_json::from_value(json!({"pricingModel": "individual", "fixedPrice": 10})).unwrap();
        assert_eq!(pricing, ItemPricing::Individual);
    }

    #[test]
    fn test_item_pricing_unknown_model_rejected() {
        let result: Result<ItemPricing, _> =
            serde_json::from_value(json!({"pricingModel": "auction"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_hotel_pricing_partial_json() {
        let pricing: HotelPricing =
            serde_json::from_value(json!({"pricingVisible": true, "pricePerPerson": 100})).unwrap();
        assert!(pricing.pricing_visible);
        assert!(!pricing.has_fixed_group_price);
        assert_eq!(pricing.price_per_person, Some(dec!(100)));
        assert_eq!(pricing.group_price, None);
    }

    #[test]
    fn test_pricing_model_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(PricingModel::PerUnit).unwrap(),
            json!("per_unit")
        );
    }
}
