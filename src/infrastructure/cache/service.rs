//! Cache service trait and error types.

use async_trait::async_trait;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    ConnectionError(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache of `code -> original_url` mappings in front of the durable store.
///
/// # Write-around policy
///
/// Entries are written **only** by the redirect path, and only with a value
/// it has just read from the durable store. The shorten path never calls
/// [`CacheService::put_url`]. A freshly shortened link therefore misses once
/// on its first redirect. This is intentional: unread links never occupy cache
/// capacity, and no entry can exist for a write the store did not confirm.
/// Do not turn this into write-through.
///
/// Entries are disposable. Dropping any of them costs one extra store read and
/// never loses data. Concurrent `put_url` calls for the same code carry the
/// same value, so races are harmless and need no per-key locking.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::MokaCache`] - In-process bounded cache (TinyLFU + TTL)
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached URL for a short code.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(url))` on cache hit
    /// - `Ok(None)` on miss
    ///
    /// # Errors
    ///
    /// Implementations may return [`CacheError`]; callers treat it as a miss.
    async fn get_url(&self, code: &str) -> CacheResult<Option<String>>;

    /// Stores a mapping read from the durable store.
    ///
    /// # Errors
    ///
    /// Implementations may return [`CacheError`]; callers log and continue.
    async fn put_url(&self, code: &str, original_url: &str) -> CacheResult<()>;

    /// Checks if the cache backend is healthy.
    async fn health_check(&self) -> bool;

    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;
}
