//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoints
///
/// - `GET /{code}`
/// - `GET /api/redirect/{code}`
///
/// # Request Flow
///
/// 1. Reject paths that cannot be codes (e.g. `favicon.ico`)
/// 2. Check cache; a hit answers without touching the store
/// 3. On miss, read the store and cache the record before answering
/// 4. Offer a click event to the background worker (dropped if the queue is full)
/// 5. Return 302 Found
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
/// Returns 503 Service Unavailable if the cache missed and the store is down.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let original_url = state.redirect_service.resolve(&code).await?;

    let location = HeaderValue::from_str(&original_url).map_err(|_| {
        AppError::internal(
            "Stored URL is not a valid Location header",
            json!({ "code": code }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
