//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::geo::GeocodeError;
use crate::quotes::{QuoteError, QuoteResponse};

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Quote request error: {0}")]
    QuoteRequest(String),

    #[error("Geocoding error: {0}")]
    Geocode(#[from] GeocodeError),
}

impl From<QuoteError> for AppError {
    fn from(e: QuoteError) -> Self {
        match e {
            QuoteError::InvalidRequest(msg) => AppError::QuoteRequest(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (StatusCode::NOT_FOUND, "Not found"),
            // Malformed carts surface as a processing failure
            AppError::QuoteRequest(msg) => {
                tracing::error!("Quote request error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to process quote request",
                )
            }
            AppError::Geocode(e) => {
                tracing::warn!("Geocoding error: {}", e);
                (StatusCode::BAD_GATEWAY, "Geocoding service unavailable")
            }
        };

        (status, Json(QuoteResponse::failed(message))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
