//! Handler for click analytics.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::dto::analytics::AnalyticsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the click total for a short code.
///
/// # Endpoint
///
/// `GET /api/v1/analytics/{code}`
///
/// # Response
///
/// ```json
/// { "shortCode": "Ab3dE9x", "clicks": 42 }
/// ```
///
/// Counts are flushed in batches, so recent redirects may lag by up to a
/// flush interval.
///
/// # Errors
///
/// Returns 404 Not Found if the short code doesn't exist.
pub async fn analytics_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let stats = state.stats_service.clicks_for(&code).await?;

    Ok(Json(AnalyticsResponse {
        short_code: stats.code,
        clicks: stats.clicks,
    }))
}
