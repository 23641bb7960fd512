//! Gastronomy pricing (lunch, supper, coffee breaks, grill, open bar).
//!
//! Selections are global to the cart and priced against each hotel's own
//! service definitions.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::Price;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GastronomyType {
    Lunch,
    Supper,
    CoffeeBreak,
    Grill,
    OpenBar,
}

impl GastronomyType {
    pub fn display_name(&self, language: &str) -> &'static str {
        let english = language.eq_ignore_ascii_case("en");
        match (self, english) {
            (GastronomyType::Lunch, false) => "Obiad",
            (GastronomyType::Lunch, true) => "Lunch",
            (GastronomyType::Supper, false) => "Kolacja",
            (GastronomyType::Supper, true) => "Supper",
            (GastronomyType::CoffeeBreak, false) => "Przerwa kawowa",
            (GastronomyType::CoffeeBreak, true) => "Coffee break",
            (GastronomyType::Grill, _) => "Grill",
            (GastronomyType::OpenBar, _) => "Open bar",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GastronomyOptions {
    pub level: Option<String>,
    pub style: Option<String>,
}

/// One gastronomy line the customer picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GastronomySelection {
    #[serde(rename = "type")]
    pub kind: GastronomyType,
    pub count: u32,
    #[serde(default)]
    pub options: Option<GastronomyOptions>,
}

/// Availability of a simple service (coffee break, grill).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Availability {
    #[default]
    Disabled,
    PriceHidden,
    WithPrice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SimpleService {
    pub availability: Availability,
    pub price_per_service: Option<Decimal>,
}

/// One priced variant of a complex service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceOption {
    pub level: Option<String>,
    pub style: Option<String>,
    pub price_per_service: Option<Decimal>,
    pub hide_pricing: bool,
}

/// Gastronomy services a hotel offers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HotelGastronomy {
    pub lunch: Vec<ServiceOption>,
    pub supper: Vec<ServiceOption>,
    pub open_bar: Vec<ServiceOption>,
    pub coffee_break: Option<SimpleService>,
    pub grill: Option<SimpleService>,
}

/// Priced gastronomy line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GastronomyPriceResult {
    #[serde(rename = "type")]
    pub kind: GastronomyType,
    pub name: String,
    pub count: u32,
    pub level: Option<String>,
    pub style: Option<String>,
    #[serde(flatten)]
    pub price: Price,
    pub unavailable: bool,
    pub price_hidden: bool,
}

/// Merge duplicate selections by (type, level, style), summing counts.
pub fn merge_selections(selections: &[GastronomySelection]) -> Vec<GastronomySelection> {
    let mut merged: BTreeMap<(GastronomyType, GastronomyOptions), u32> = BTreeMap::new();
    for selection in selections {
        let options = selection.options.clone().unwrap_or_default();
        let count = merged.entry((selection.kind, options)).or_insert(0);
        *count = count.saturating_add(selection.count);
    }

    merged
        .into_iter()
        .map(|((kind, options), count)| GastronomySelection {
            kind,
            count,
            options: Some(options),
        })
        .collect()
}

/// Price every (merged) selection against one hotel's services.
pub fn calculate_gastronomy(
    selections: &[GastronomySelection],
    services: Option<&HotelGastronomy>,
    language: &str,
) -> Vec<GastronomyPriceResult> {
    let empty = HotelGastronomy::default();
    let services = services.unwrap_or(&empty);

    merge_selections(selections)
        .iter()
        .filter(|s| s.count > 0)
        .map(|s| price_selection(s, services, language))
        .collect()
}

fn price_selection(
    selection: &GastronomySelection,
    services: &HotelGastronomy,
    language: &str,
) -> GastronomyPriceResult {
    let options = selection.options.clone().unwrap_or_default();
    let count = Decimal::from(selection.count);

    let (price, unavailable, price_hidden) = match selection.kind {
        GastronomyType::CoffeeBreak | GastronomyType::Grill => {
            let service = match selection.kind {
                GastronomyType::CoffeeBreak => services.coffee_break.as_ref(),
                _ => services.grill.as_ref(),
            };
            match service.map(|s| (s.availability, s.price_per_service)) {
                None | Some((Availability::Disabled, _)) => (Price::ZERO, true, false),
                Some((Availability::PriceHidden, _)) => (Price::ZERO, false, true),
                Some((Availability::WithPrice, per_service)) => (
                    Price::from_netto(per_service.unwrap_or(Decimal::ZERO) * count),
                    false,
                    false,
                ),
            }
        }
        GastronomyType::Lunch | GastronomyType::Supper | GastronomyType::OpenBar => {
            let candidates = match selection.kind {
                GastronomyType::Lunch => &services.lunch,
                GastronomyType::Supper => &services.supper,
                _ => &services.open_bar,
            };
            match find_option(candidates, &options) {
                None => (Price::ZERO, true, false),
                Some(option) if option.hide_pricing => (Price::ZERO, false, true),
                Some(option) => (
                    Price::from_netto(option.price_per_service.unwrap_or(Decimal::ZERO) * count),
                    false,
                    false,
                ),
            }
        }
    };

    GastronomyPriceResult {
        kind: selection.kind,
        name: display_name(selection.kind, &options, language),
        count: selection.count,
        level: options.level,
        style: options.style,
        price,
        unavailable,
        price_hidden,
    }
}

/// Style only participates in matching when the selection names one.
fn find_option<'a>(
    candidates: &'a [ServiceOption],
    wanted: &GastronomyOptions,
) -> Option<&'a ServiceOption> {
    candidates.iter().find(|option| {
        option.level == wanted.level && (wanted.style.is_none() || option.style == wanted.style)
    })
}

fn display_name(kind: GastronomyType, options: &GastronomyOptions, language: &str) -> String {
    let qualifiers: Vec<&str> = [options.level.as_deref(), options.style.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    if qualifiers.is_empty() {
        kind.display_name(language).to_string()
    } else {
        format!("{} ({})", kind.display_name(language), qualifiers.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn selection(kind: GastronomyType, count: u32, level: Option<&str>, style: Option<&str>) -> GastronomySelection {
        GastronomySelection {
            kind,
            count,
            options: Some(GastronomyOptions {
                level: level.map(str::to_string),
                style: style.map(str::to_string),
            }),
        }
    }

    fn hotel_services() -> HotelGastronomy {
        HotelGastronomy {
            lunch: vec![
                ServiceOption {
                    level: Some("standard".to_string()),
                    style: Some("buffet".to_string()),
                    price_per_service: Some(dec!(80)),
                    hide_pricing: false,
                },
                ServiceOption {
                    level: Some("premium".to_string()),
                    style: Some("served".to_string()),
                    price_per_service: Some(dec!(150)),
                    hide_pricing: true,
                },
            ],
            supper: vec![],
            open_bar: vec![ServiceOption {
                level: Some("basic".to_string()),
                style: None,
                price_per_service: Some(dec!(60)),
                hide_pricing: false,
            }],
            coffee_break: Some(SimpleService {
                availability: Availability::WithPrice,
                price_per_service: Some(dec!(25)),
            }),
            grill: Some(SimpleService {
                availability: Availability::PriceHidden,
                price_per_service: Some(dec!(99)),
            }),
        }
    }

    #[test]
    fn test_selection_from_json() {
        let parsed: GastronomySelection = serde_json::from_value(json!({
            "type": "coffee-break",
            "count": 2
        }))
        .unwrap();
        assert_eq!(parsed.kind, GastronomyType::CoffeeBreak);
        assert_eq!(parsed.options, None);
    }

    #[test]
    fn test_merge_sums_duplicates() {
        let merged = merge_selections(&[
            selection(GastronomyType::Lunch, 10, Some("standard"), Some("buffet")),
            selection(GastronomyType::Lunch, 5, Some("standard"), Some("buffet")),
            selection(GastronomyType::Lunch, 3, Some("premium"), Some("served")),
        ]);
        assert_eq!(merged.len(), 2);
        let standard = merged
            .iter()
            .find(|s| s.options.as_ref().unwrap().level.as_deref() == Some("standard"))
            .unwrap();
        assert_eq!(standard.count, 15);
    }

    #[test]
    fn test_merge_saturates_huge_counts() {
        let merged = merge_selections(&[
            selection(GastronomyType::Grill, 3_000_000_000, None, None),
            selection(GastronomyType::Grill, 3_000_000_000, None, None),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].count, u32::MAX);
    }

    #[test]
    fn test_complex_service_priced() {
        let result = calculate_gastronomy(
            &[selection(GastronomyType::Lunch, 10, Some("standard"), Some("buffet"))],
            Some(&hotel_services()),
            "pl",
        );
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Obiad (standard, buffet)");
        assert_eq!(result[0].price.netto, dec!(800));
        assert_eq!(result[0].price.brutto, dec!(984));
        assert!(!result[0].unavailable);
    }

    #[test]
    fn test_complex_service_hidden_price() {
        let result = calculate_gastronomy(
            &[selection(GastronomyType::Lunch, 10, Some("premium"), Some("served"))],
            Some(&hotel_services()),
            "en",
        );
        assert!(result[0].price_hidden);
        assert!(result[0].price.is_zero());
        assert_eq!(result[0].name, "Lunch (premium, served)");
    }

    #[test]
    fn test_complex_service_no_match_is_unavailable() {
        let result = calculate_gastronomy(
            &[selection(GastronomyType::Supper, 10, Some("standard"), None)],
            Some(&hotel_services()),
            "pl",
        );
        assert!(result[0].unavailable);
        assert!(result[0].price.is_zero());
    }

    #[test]
    fn test_open_bar_matches_on_level_only() {
        let result = calculate_gastronomy(
            &[selection(GastronomyType::OpenBar, 2, Some("basic"), None)],
            Some(&hotel_services()),
            "pl",
        );
        assert_eq!(result[0].price.netto, dec!(120));
        assert_eq!(result[0].name, "Open bar (basic)");
    }

    #[test]
    fn test_simple_services() {
        let result = calculate_gastronomy(
            &[
                selection(GastronomyType::CoffeeBreak, 4, None, None),
                selection(GastronomyType::Grill, 1, None, None),
            ],
            Some(&hotel_services()),
            "pl",
        );
        let coffee = result.iter().find(|r| r.kind == GastronomyType::CoffeeBreak).unwrap();
        assert_eq!(coffee.price.netto, dec!(100));
        assert_eq!(coffee.name, "Przerwa kawowa");

        let grill = result.iter().find(|r| r.kind == GastronomyType::Grill).unwrap();
        assert!(grill.price_hidden);
        assert!(grill.price.is_zero());
    }

    #[test]
    fn test_hotel_without_services_marks_unavailable() {
        let result = calculate_gastronomy(
            &[selection(GastronomyType::CoffeeBreak, 4, None, None)],
            None,
            "pl",
        );
        assert!(result[0].unavailable);
    }

    #[test]
    fn test_zero_count_selections_dropped() {
        let result = calculate_gastronomy(
            &[selection(GastronomyType::CoffeeBreak, 0, None, None)],
            Some(&hotel_services()),
            "pl",
        );
        assert!(result.is_empty());
    }
}
