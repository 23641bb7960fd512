//! Shared fakes for router-level tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal_macros::dec;
use serde_json::Value;
use tower::ServiceExt;

use eventquote_web::cache::AppCache;
use eventquote_web::cms::{CmsClient, CmsError, CreatedDocument};
use eventquote_web::geo::{Coordinates, GeocodeError, Geocoder, ReverseAddress};
use eventquote_web::pricing::TransportSettings;
use eventquote_web::{router, AppState};

pub const WARSAW: Coordinates = Coordinates {
    lat: 52.2297,
    lng: 21.0122,
};
pub const KRAKOW: Coordinates = Coordinates {
    lat: 50.0647,
    lng: 19.9450,
};

/// In-memory CMS: no settings document, records created documents.
#[derive(Default)]
pub struct FakeCms {
    pub created: Mutex<Vec<Value>>,
    pub fail_writes: bool,
}

#[async_trait]
impl CmsClient for FakeCms {
    async fn fetch(&self, _query: &str, _params: Value) -> Result<Value, CmsError> {
        Ok(Value::Null)
    }

    async fn create(&self, document: Value) -> Result<CreatedDocument, CmsError> {
        if self.fail_writes {
            return Err(CmsError::UnexpectedResponse("dataset is read-only".to_string()));
        }
        let mut created = self.created.lock().unwrap();
        created.push(document);
        Ok(CreatedDocument {
            id: format!("quote-{}", created.len()),
        })
    }
}

/// Knows two cities; "Atlantis" makes the service fail.
pub struct FakeGeocoder;

#[async_trait]
impl Geocoder for FakeGeocoder {
    async fn search(&self, query: &str) -> Result<Option<Coordinates>, GeocodeError> {
        match query {
            "Warszawa" => Ok(Some(WARSAW)),
            "Kraków" => Ok(Some(KRAKOW)),
            "Atlantis" => Err(GeocodeError::Malformed("NaN".to_string())),
            _ => Ok(None),
        }
    }

    async fn reverse(&self, coords: Coordinates) -> Result<Option<ReverseAddress>, GeocodeError> {
        if coords.is_same_location(&WARSAW) {
            Ok(Some(ReverseAddress {
                street: "Marszałkowska 1".to_string(),
                postal_code: "00-001".to_string(),
                city: "Warszawa".to_string(),
            }))
        } else {
            Ok(None)
        }
    }
}

pub fn transport_settings() -> TransportSettings {
    TransportSettings {
        base_price: dec!(1000),
        price_per_km: dec!(5),
        max_free_kilometers: 20,
        max_people_per_bus: 50,
    }
}

pub fn app_with(cms: Arc<FakeCms>) -> Router {
    let state = AppState::new(
        cms,
        Arc::new(FakeGeocoder),
        AppCache::new(),
        transport_settings(),
    );
    router(state)
}

pub async fn post_json(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}
