//! Click statistics service.

use std::sync::Arc;

use crate::domain::repositories::{LinkRepository, StatsRepository};
use crate::error::AppError;
use serde_json::json;

/// Click totals for one short code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkClicks {
    pub code: String,
    pub clicks: u64,
}

/// Service for reading click counters.
///
/// Counts are eventually consistent: the click worker flushes them in
/// batches, so a redirect served a moment ago may not be counted yet.
pub struct StatsService {
    links: Arc<dyn LinkRepository>,
    stats: Arc<dyn StatsRepository>,
}

impl StatsService {
    /// Creates a new statistics service.
    pub fn new(links: Arc<dyn LinkRepository>, stats: Arc<dyn StatsRepository>) -> Self {
        Self { links, stats }
    }

    /// Returns the click total for an existing short code.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist.
    /// Returns [`AppError::Unavailable`] if a store cannot be reached.
    pub async fn clicks_for(&self, code: &str) -> Result<LinkClicks, AppError> {
        if self.links.find_by_code(code).await?.is_none() {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }

        let clicks = self.stats.click_count(code).await?;

        Ok(LinkClicks {
            code: code.to_string(),
            clicks,
        })
    }
}
