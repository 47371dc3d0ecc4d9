//! In-process cache backed by `moka`.

use super::service::{CacheResult, CacheService};
use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// A cached projection of a link record.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub original_url: Arc<str>,
    pub inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Time since the entry was populated from the store.
    pub fn age(&self) -> TimeDelta {
        Utc::now() - self.inserted_at
    }
}

/// Bounded in-memory cache for the redirect hot path.
///
/// Eviction is moka's TinyLFU admission with LRU eviction once
/// `max_capacity` entries are held, plus a fixed time-to-live. Reads are
/// lock-free for the common case and never block other keys.
pub struct MokaCache {
    inner: Cache<String, CacheEntry>,
}

impl MokaCache {
    /// Creates a cache holding at most `max_capacity` entries for `ttl` each.
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = Cache::builder()
            .name("links")
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        debug!(
            "MokaCache initialized with max capacity: {}, TTL: {}s",
            max_capacity,
            ttl.as_secs()
        );

        Self { inner }
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }

    /// Applies pending evictions and bookkeeping immediately.
    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[async_trait]
impl CacheService for MokaCache {
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>> {
        match self.inner.get(code).await {
            Some(entry) => {
                debug!(
                    "Cache HIT: {} (age {}s)",
                    code,
                    entry.age().num_seconds()
                );
                Ok(Some(entry.original_url.to_string()))
            }
            None => {
                debug!("Cache MISS: {}", code);
                Ok(None)
            }
        }
    }

    async fn put_url(&self, code: &str, original_url: &str) -> CacheResult<()> {
        let entry = CacheEntry {
            original_url: Arc::from(original_url),
            inserted_at: Utc::now(),
        };
        self.inner.insert(code.to_string(), entry).await;
        debug!("Cache SET: {} -> {}", code, original_url);
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
