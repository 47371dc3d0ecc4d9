//! Write-around cache for fast redirect lookups.
//!
//! Provides a [`CacheService`] trait with three implementations:
//! - [`MokaCache`] - In-process bounded cache (default)
//! - [`RedisCache`] - Shared Redis-backed cache
//! - [`NullCache`] - No-op implementation for disabled caching

mod moka_cache;
mod null_cache;
mod redis_cache;
mod service;

pub use moka_cache::{CacheEntry, MokaCache};
pub use null_cache::NullCache;
pub use redis_cache::RedisCache;
pub use service::{CacheError, CacheResult, CacheService};
