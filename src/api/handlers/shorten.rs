//! Handler for link shortening endpoint.

use axum::{
    Json,
    extract::{ConnectInfo, State, rejection::JsonRejection},
    http::HeaderMap,
};
use serde_json::json;
use std::net::SocketAddr;
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::client_key::extract_client_key;

/// Creates a short link for one URL.
///
/// # Endpoint
///
/// `POST /api/v1/shorten`
///
/// # Request Body
///
/// ```json
/// { "originalUrl": "https://example.com/a/b/c" }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "shortUrl": "http://localhost:8080/Ab3dE9x",
///   "code": "Ab3dE9x",
///   "originalUrl": "https://example.com/a/b/c"
/// }
/// ```
///
/// # Errors
///
/// - 400 if the body is malformed or the URL is invalid
/// - 429 with `Retry-After` when the client is over budget
/// - 500 if no free code was found
/// - 503 if the store is unreachable
pub async fn shorten_handler(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| {
        AppError::bad_request("Invalid request body", json!({ "reason": e.body_text() }))
    })?;
    payload.validate()?;

    let client_key = extract_client_key(
        &headers,
        Some(addr),
        state.behind_proxy,
        &state.api_keys,
    );

    let shortened = state
        .shorten_service
        .shorten(&client_key, &payload.original_url)
        .await?;

    Ok(Json(ShortenResponse {
        short_url: shortened.short_url,
        code: shortened.link.code,
        original_url: shortened.link.original_url,
    }))
}
