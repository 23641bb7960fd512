//! Quote route handlers

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use tracing::error;

use crate::error::{AppError, Result};
use crate::quotes::{persistence, QuoteRequest, QuoteResponse};
use crate::AppState;

/// `POST /api/quotes`: price the cart, store it, return the quote.
///
/// A failed save still returns the computed quote (with status 500) so the
/// form can show prices.
pub async fn create(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<QuoteResponse>)> {
    let request: QuoteRequest =
        serde_json::from_slice(&body).map_err(|e| AppError::QuoteRequest(e.to_string()))?;

    let quote = state.quotes.build_quote(&request).await?;

    match persistence::save_quote(state.cms.as_ref(), &quote).await {
        Ok(created) => Ok((StatusCode::OK, Json(QuoteResponse::saved(quote, created.id)))),
        Err(e) => {
            error!("Failed to save quote {}: {}", quote.quote_id, e);
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(QuoteResponse::unsaved(quote, e.to_string())),
            ))
        }
    }
}
