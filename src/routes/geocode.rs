//! Geocoding proxy used by the address picker

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::geo::{Coordinates, ReverseAddress};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

/// `GET /api/geocode/search?q=`
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Coordinates>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(AppError::NotFound);
    }
    state
        .geocoder
        .search(q)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}

/// `GET /api/geocode/reverse?lat=&lng=`
pub async fn reverse(
    State(state): State<AppState>,
    Query(query): Query<ReverseQuery>,
) -> Result<Json<ReverseAddress>> {
    let coords = Coordinates::new(query.lat, query.lng);
    if !coords.is_valid() {
        return Err(AppError::NotFound);
    }
    state
        .geocoder
        .reverse(coords)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound)
}
