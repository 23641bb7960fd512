//! Transport pricing: bus planning and pickup → destination legs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::geo::{distance_km, Located};

use super::money::{round_money, Price};

/// Reserved cart extra id carrying the transport request.
pub const TRANSPORT_EXTRA_ID: &str = "transport";

/// Transport pricing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportSettings {
    pub base_price: Decimal,
    pub price_per_km: Decimal,
    pub max_free_kilometers: u32,
    pub max_people_per_bus: u32,
}

/// How many buses a group needs and how full they are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusPlan {
    pub number_of_buses: u32,
    pub people_per_bus: u32,
}

/// Plan buses for a group.
///
/// Capacity is the requested people-per-bus capped at the configured maximum.
/// At least one bus is always planned.
pub fn plan_buses(participant_count: u32, requested_per_bus: Option<u32>, max_per_bus: u32) -> BusPlan {
    let max_per_bus = max_per_bus.max(1);
    let capacity = requested_per_bus
        .filter(|n| *n > 0)
        .unwrap_or(max_per_bus)
        .min(max_per_bus);

    let number_of_buses = participant_count.div_ceil(capacity).max(1);
    let people_per_bus = participant_count.div_ceil(number_of_buses);

    BusPlan {
        number_of_buses,
        people_per_bus,
    }
}

/// `round(buses × (base + max(0, km − free km) × per km))`, brutto from that.
pub fn transport_price(settings: &TransportSettings, plan: &BusPlan, distance_km: u32) -> Price {
    let chargeable_km = distance_km.saturating_sub(settings.max_free_kilometers);
    let per_bus = settings.base_price + Decimal::from(chargeable_km) * settings.price_per_km;
    Price::from_netto(round_money(Decimal::from(plan.number_of_buses) * per_bus))
}

/// What the transport leg is going to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Hotel,
    /// Activity held at its own venue.
    Activity,
    /// Nationwide activity held at an address the customer supplied.
    NationwideActivity,
}

/// Result of resolving one transport leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum TransportOutcome {
    #[serde(rename_all = "camelCase")]
    Priced { distance_km: u32 },
    HotelNoAddress,
    HotelAddressNotFound,
    NoTransportAddress,
    TransportAddressNotFound,
    BothAddressesNotFound,
    ActivityNoAddress,
    ActivityAddressNotFound,
    UserSelectedActivityAddressNotFound,
    NationwideActivityNoUserAddress,
}

impl TransportOutcome {
    pub fn distance_km(&self) -> u32 {
        match self {
            TransportOutcome::Priced { distance_km } => *distance_km,
            _ => 0,
        }
    }

    /// Diagnostic name for flagged outcomes.
    pub fn flag(&self) -> Option<&'static str> {
        match self {
            TransportOutcome::Priced { .. } => None,
            TransportOutcome::HotelNoAddress => Some("hotelNoAddress"),
            TransportOutcome::HotelAddressNotFound => Some("hotelAddressNotFound"),
            TransportOutcome::NoTransportAddress => Some("noTransportAddress"),
            TransportOutcome::TransportAddressNotFound => Some("transportAddressNotFound"),
            TransportOutcome::BothAddressesNotFound => Some("bothAddressesNotFound"),
            TransportOutcome::ActivityNoAddress => Some("activityNoAddress"),
            TransportOutcome::ActivityAddressNotFound => Some("activityAddressNotFound"),
            TransportOutcome::UserSelectedActivityAddressNotFound => {
                Some("userSelectedActivityAddressNotFound")
            }
            TransportOutcome::NationwideActivityNoUserAddress => {
                Some("nationwideActivityNoUserAddress")
            }
        }
    }
}

/// Priced transport leg attached to a quote item.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportQuote {
    #[serde(flatten)]
    pub outcome: TransportOutcome,
    #[serde(flatten)]
    pub plan: BusPlan,
    #[serde(flatten)]
    pub price: Price,
    /// The pickup address was given but could not be geocoded.
    pub transport_geocoding_failed: bool,
}

/// Classify a leg from pickup and destination lookups.
///
/// Returns `None` when both ends are the same place: no transport is charged.
pub fn classify_leg(
    pickup: Located,
    destination: Located,
    kind: Destination,
) -> Option<TransportOutcome> {
    use Located::{Found, Missing, NotFound};

    let outcome = match (pickup, destination) {
        (Found(from), Found(to)) => {
            if from.is_same_location(&to) {
                return None;
            }
            TransportOutcome::Priced {
                distance_km: distance_km(from, to),
            }
        }
        (NotFound, NotFound) => TransportOutcome::BothAddressesNotFound,
        (_, Missing) => match kind {
            Destination::Hotel => TransportOutcome::HotelNoAddress,
            Destination::Activity => TransportOutcome::ActivityNoAddress,
            Destination::NationwideActivity => TransportOutcome::NationwideActivityNoUserAddress,
        },
        (Missing, _) => TransportOutcome::NoTransportAddress,
        (NotFound, Found(_)) => TransportOutcome::TransportAddressNotFound,
        (Found(_), NotFound) => match kind {
            Destination::Hotel => TransportOutcome::HotelAddressNotFound,
            Destination::Activity => TransportOutcome::ActivityAddressNotFound,
            Destination::NationwideActivity => {
                TransportOutcome::UserSelectedActivityAddressNotFound
            }
        },
    };

    Some(outcome)
}

/// Resolve and price one transport leg. Flagged legs are priced at zero
/// distance so their base cost still shows up.
pub fn resolve_leg(
    settings: &TransportSettings,
    plan: &BusPlan,
    pickup: Located,
    destination: Located,
    kind: Destination,
) -> Option<TransportQuote> {
    let outcome = classify_leg(pickup, destination, kind)?;
    let price = transport_price(settings, plan, outcome.distance_km());

    Some(TransportQuote {
        outcome,
        plan: *plan,
        price,
        transport_geocoding_failed: pickup == Located::NotFound,
    })
}
