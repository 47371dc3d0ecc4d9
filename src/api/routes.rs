//! API route configuration.

use crate::api::handlers::{analytics_handler, redirect_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Versioned JSON API, nested under `/api`.
///
/// # Endpoints
///
/// - `POST /v1/shorten`           - Create a short link (rate limited per client)
/// - `GET  /v1/analytics/{code}`  - Click total for a link
/// - `GET  /redirect/{code}`      - Redirect alias for clients that cannot hit `/{code}`
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/shorten", post(shorten_handler))
        .route("/v1/analytics/{code}", get(analytics_handler))
        .route("/redirect/{code}", get(redirect_handler))
}
