//! Stores a computed quote as a CMS document.

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::cms::{CmsClient, CmsError, CreatedDocument};
use crate::pricing::{TransportOutcome, TransportQuote};

use super::ids::generate_key;
use super::requests::{normalize_date, SelectedDate};
use super::responses::{PricedLine, Quote, QuoteItem};

pub const QUOTE_DOCUMENT_TYPE: &str = "quote";

/// Boolean transport flags the CMS schema stores; exactly one is set for a
/// flagged leg, none for a priced one.
const TRANSPORT_FLAGS: [&str; 9] = [
    "hotelNoAddress",
    "hotelAddressNotFound",
    "noTransportAddress",
    "transportAddressNotFound",
    "bothAddressesNotFound",
    "activityNoAddress",
    "activityAddressNotFound",
    "userSelectedActivityAddressNotFound",
    "nationwideActivityNoUserAddress",
];

/// Write the quote with a single create call.
pub async fn save_quote(cms: &dyn CmsClient, quote: &Quote) -> Result<CreatedDocument, CmsError> {
    let document = to_document(quote);
    let created = cms.create(document).await?;
    info!("Quote {} saved as document {}", quote.quote_id, created.id);
    Ok(created)
}

/// CMS document for a quote.
pub fn to_document(quote: &Quote) -> Value {
    json!({
        "_type": QUOTE_DOCUMENT_TYPE,
        "quoteId": quote.quote_id,
        "createdAt": quote.created_at.to_rfc3339(),
        "participantCount": quote.participant_count,
        "language": quote.language,
        "selectedDates": quote.selected_dates.iter().filter_map(date_entry).collect::<Vec<_>>(),
        "items": quote.items.iter().map(item_entry).collect::<Vec<_>>(),
        "totalPrice": quote.total_price,
        "totalNettoPrice": quote.total_netto_price,
    })
}

fn date_entry(date: &SelectedDate) -> Option<Value> {
    let entry = match date {
        SelectedDate::Single(day) => json!({
            "_type": "singleDate",
            "date": normalize(day)?,
        }),
        SelectedDate::Range {
            start_date,
            end_date,
        } => {
            let start = normalize(start_date)?;
            let end = match end_date {
                Some(end) => normalize(end)?,
                None => start.clone(),
            };
            json!({
                "_type": "dateRange",
                "startDate": start,
                "endDate": end,
            })
        }
    };
    Some(keyed(entry))
}

fn normalize(input: &str) -> Option<String> {
    let normalized = normalize_date(input);
    if normalized.is_none() {
        warn!("Dropping unparseable date from quote document: {}", input);
    }
    normalized
}

fn item_entry(item: &QuoteItem) -> Value {
    let mut entry = to_object(&item.entity);
    entry.insert("_type".to_string(), json!("quoteItem"));
    entry.insert("refId".to_string(), json!(item.id));
    entry.insert("name".to_string(), json!(item.name));
    entry.insert(
        "addons".to_string(),
        Value::Array(item.addons.iter().map(line_entry).collect()),
    );
    entry.insert(
        "gastronomy".to_string(),
        Value::Array(item.gastronomy.iter().map(|g| keyed(to_value(g))).collect()),
    );
    entry.insert(
        "transport".to_string(),
        item.transport.as_ref().map(transport_entry).unwrap_or(Value::Null),
    );
    entry.insert(
        "extras".to_string(),
        Value::Array(item.extras.iter().map(line_entry).collect()),
    );
    entry.insert("totalPrice".to_string(), json!(item.total_price));
    entry.insert("totalNettoPrice".to_string(), json!(item.total_netto_price));
    keyed(Value::Object(entry))
}

fn line_entry(line: &PricedLine) -> Value {
    let mut entry = to_object(line);
    entry.insert("refId".to_string(), json!(line.id));
    entry.remove("id");
    keyed(Value::Object(entry))
}

fn transport_entry(leg: &TransportQuote) -> Value {
    let flag = leg.outcome.flag();
    let mut entry = Map::new();
    entry.insert("distance".to_string(), json!(leg.outcome.distance_km()));
    entry.insert("numberOfBuses".to_string(), json!(leg.plan.number_of_buses));
    entry.insert("peoplePerBus".to_string(), json!(leg.plan.people_per_bus));
    entry.insert("netto".to_string(), json!(leg.price.netto));
    entry.insert("brutto".to_string(), json!(leg.price.brutto));
    entry.insert(
        "priced".to_string(),
        json!(matches!(leg.outcome, TransportOutcome::Priced { .. })),
    );
    entry.insert(
        "transportGeocodingFailed".to_string(),
        json!(leg.transport_geocoding_failed),
    );
    for name in TRANSPORT_FLAGS {
        entry.insert(name.to_string(), json!(flag == Some(name)));
    }
    Value::Object(entry)
}

fn keyed(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            map.insert("_key".to_string(), json!(generate_key()));
            Value::Object(map)
        }
        other => other,
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    // Serializing our own plain structs into a Value cannot fail.
    serde_json::to_value(value).unwrap_or(Value::Null)
}

fn to_object<T: Serialize>(value: &T) -> Map<String, Value> {
    match to_value(value) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{
        calculate_activity_price, calculate_item_price, plan_buses, resolve_leg, ActivityPricing,
        Destination, ItemPricing, TransportSettings,
    };
    use crate::geo::{Coordinates, Located};
    use crate::quotes::responses::EntityPrice;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn sample_quote() -> Quote {
        let settings = TransportSettings {
            base_price: dec!(1000),
            price_per_km: dec!(5),
            max_free_kilometers: 20,
            max_people_per_bus: 50,
        };
        let plan = plan_buses(12, None, 50);
        let leg = resolve_leg(
            &settings,
            &plan,
            Located::Missing,
            Located::Found(Coordinates::new(50.0, 20.0)),
            Destination::Activity,
        );

        let item = QuoteItem::new(
            "a1".to_string(),
            "Rafting".to_string(),
            EntityPrice::Activity(calculate_activity_price(
                Some(&ActivityPricing {
                    base_price: Some(dec!(500)),
                    max_participants: Some(10),
                    additional_person_price: Some(dec!(30)),
                }),
                None,
                12,
            )),
            vec![PricedLine {
                id: "helmet".to_string(),
                name: "Helmet".to_string(),
                count: Some(2),
                result: calculate_item_price(&ItemPricing::Fixed { fixed_price: dec!(50) }, Some(2), 12),
            }],
            vec![],
            leg,
            vec![],
        );

        let total = item.total();
        Quote {
            quote_id: "ABC1234".to_string(),
            created_at: Utc::now(),
            participant_count: 12,
            language: "pl".to_string(),
            selected_dates: vec![
                SelectedDate::Single("2026-06-01T10:00:00Z".to_string()),
                SelectedDate::Range {
                    start_date: "2026-06-10".to_string(),
                    end_date: None,
                },
                SelectedDate::Single("garbage".to_string()),
            ],
            items: vec![item],
            total_price: total.brutto,
            total_netto_price: total.netto,
        }
    }

    #[test]
    fn test_document_envelope() {
        let doc = to_document(&sample_quote());
        assert_eq!(doc["_type"], json!("quote"));
        assert_eq!(doc["quoteId"], json!("ABC1234"));
        assert_eq!(doc["participantCount"], json!(12));
        // 560 + 50 + 1000 netto
        assert_eq!(doc["totalNettoPrice"].as_f64(), Some(1610.0));
    }

    #[test]
    fn test_document_dates_normalized() {
        let doc = to_document(&sample_quote());
        let dates = doc["selectedDates"].as_array().unwrap();
        assert_eq!(dates.len(), 2);
        assert_eq!(dates[0]["date"], json!("2026-06-01"));
        assert_eq!(dates[1]["startDate"], json!("2026-06-10"));
        assert_eq!(dates[1]["endDate"], json!("2026-06-10"));
        assert!(dates.iter().all(|d| d["_key"].is_string()));
    }

    #[test]
    fn test_document_items_keyed() {
        let doc = to_document(&sample_quote());
        let item = &doc["items"][0];
        assert!(item["_key"].is_string());
        assert_eq!(item["_type"], json!("quoteItem"));
        assert_eq!(item["itemType"], json!("activity"));
        assert_eq!(item["refId"], json!("a1"));
        assert!(item["addons"][0]["_key"].is_string());
        assert_eq!(item["addons"][0]["refId"], json!("helmet"));
        assert!(item["addons"][0].get("id").is_none());
    }

    #[test]
    fn test_document_transport_flags_are_booleans() {
        let doc = to_document(&sample_quote());
        let transport = &doc["items"][0]["transport"];
        assert_eq!(transport["noTransportAddress"], json!(true));
        assert_eq!(transport["priced"], json!(false));
        for name in TRANSPORT_FLAGS.iter().filter(|n| **n != "noTransportAddress") {
            assert_eq!(transport[*name], json!(false), "{name}");
        }
        assert_eq!(transport["distance"], json!(0));
        assert_eq!(transport["transportGeocodingFailed"], json!(false));
    }

    #[test]
    fn test_document_records_pickup_geocoding_failure() {
        let mut quote = sample_quote();
        let plan = plan_buses(12, None, 50);
        quote.items[0].transport = resolve_leg(
            &TransportSettings {
                base_price: dec!(1000),
                price_per_km: dec!(5),
                max_free_kilometers: 20,
                max_people_per_bus: 50,
            },
            &plan,
            Located::NotFound,
            Located::Found(Coordinates::new(50.0, 20.0)),
            Destination::Activity,
        );

        let doc = to_document(&quote);
        let transport = &doc["items"][0]["transport"];
        assert_eq!(transport["transportGeocodingFailed"], json!(true));
        assert_eq!(transport["transportAddressNotFound"], json!(true));
    }

    struct RecordingCms(Mutex<Vec<Value>>);

    #[async_trait]
    impl CmsClient for RecordingCms {
        async fn fetch(&self, _query: &str, _params: Value) -> Result<Value, CmsError> {
            Ok(Value::Null)
        }

        async fn create(&self, document: Value) -> Result<CreatedDocument, CmsError> {
            self.0.lock().unwrap().push(document);
            Ok(CreatedDocument {
                id: "quote-doc".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_save_quote_single_create() {
        let cms = RecordingCms(Mutex::new(vec![]));
        let created = save_quote(&cms, &sample_quote()).await.unwrap();
        assert_eq!(created.id, "quote-doc");
        assert_eq!(cms.0.lock().unwrap().len(), 1);
    }
}
