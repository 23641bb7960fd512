//! Health and cache monitoring

use axum::{extract::State, Json};

use crate::cache::CacheStats;
use crate::AppState;

pub async fn health() -> &'static str {
    "OK"
}

pub async fn cache_stats(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.stats())
}
