//! HTTP routes

pub mod geocode;
pub mod health;
pub mod quotes;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/cache/stats", get(health::cache_stats))
        .route("/api/quotes", post(quotes::create))
        .route("/api/geocode/search", get(geocode::search))
        .route("/api/geocode/reverse", get(geocode::reverse))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
