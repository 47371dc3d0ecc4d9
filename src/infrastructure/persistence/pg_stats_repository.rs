//! PostgreSQL implementation of statistics repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// PostgreSQL repository for click counters.
///
/// Counters are kept in `link_stats` and upserted in batches by the click
/// worker; the `links` table is never touched.
pub struct PgStatsRepository {
    pool: Arc<PgPool>,
}

impl PgStatsRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StatsRepository for PgStatsRepository {
    async fn increment_clicks(&self, code: &str, clicks: u64) -> Result<(), AppError> {
        let clicks = i64::try_from(clicks).unwrap_or(i64::MAX);

        sqlx::query(
            r#"
            INSERT INTO link_stats (code, clicks)
            VALUES ($1, $2)
            ON CONFLICT (code) DO UPDATE SET clicks = link_stats.clicks + EXCLUDED.clicks
            "#,
        )
        .bind(code)
        .bind(clicks)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn click_count(&self, code: &str) -> Result<u64, AppError> {
        let clicks: Option<i64> =
            sqlx::query_scalar("SELECT clicks FROM link_stats WHERE code = $1")
                .bind(code)
                .fetch_optional(self.pool.as_ref())
                .await?;

        Ok(clicks.map_or(0, |c| c.max(0) as u64))
    }
}
