//! Process-local click counters.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::repositories::StatsRepository;
use crate::error::AppError;

/// Click counters held in a concurrent map. Lost on restart.
#[derive(Default)]
pub struct InMemoryStatsRepository {
    clicks: DashMap<String, u64>,
}

impl InMemoryStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StatsRepository for InMemoryStatsRepository {
    async fn increment_clicks(&self, code: &str, clicks: u64) -> Result<(), AppError> {
        let mut counter = self.clicks.entry(code.to_string()).or_insert(0);
        *counter = counter.saturating_add(clicks);
        Ok(())
    }

    async fn click_count(&self, code: &str) -> Result<u64, AppError> {
        Ok(self.clicks.get(code).map_or(0, |c| *c))
    }
}
