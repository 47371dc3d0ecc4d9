//! Repository trait for click counters.

use crate::error::AppError;
use async_trait::async_trait;

/// Storage for per-code click totals.
///
/// Counters live apart from link records so that serving a redirect never
/// mutates the durable link store.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgStatsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStatsRepository`] - process-local implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatsRepository: Send + Sync {
    /// Adds `clicks` to the counter for `code`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on storage errors.
    async fn increment_clicks(&self, code: &str, clicks: u64) -> Result<(), AppError>;

    /// Returns the total recorded clicks for `code` (zero when never clicked).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unavailable`] or [`AppError::Internal`] on storage errors.
    async fn click_count(&self, code: &str) -> Result<u64, AppError>;
}
