//! DTOs for click analytics.

use serde::Serialize;

/// Click total for one short code.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub short_code: String,
    pub clicks: u64,
}
