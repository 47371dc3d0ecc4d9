//! Short code resolution for redirects.

use std::sync::Arc;

use axum::http::HeaderValue;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::code_generator::is_valid_code;

/// Resolves short codes to their original URLs.
///
/// `Requested -> CacheChecked -> (Hit | StoreLookup) -> Responded`:
///
/// - a cache hit answers without touching the store
/// - on a miss the store is read; a found record is written to the cache
///   before answering, an unknown code is not cached
/// - a cache failure is treated as a miss
///
/// Every served redirect offers a [`ClickEvent`] to the click queue without
/// waiting. The store is only ever read here.
pub struct RedirectService {
    links: Arc<dyn LinkRepository>,
    cache: Arc<dyn CacheService>,
    click_tx: mpsc::Sender<ClickEvent>,
}

impl RedirectService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        cache: Arc<dyn CacheService>,
        click_tx: mpsc::Sender<ClickEvent>,
    ) -> Self {
        Self {
            links,
            cache,
            click_tx,
        }
    }

    /// Returns the URL `code` redirects to.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for unknown codes and paths that cannot be codes
    /// - [`AppError::Unavailable`] if the cache missed and the store is down
    /// - [`AppError::Internal`] if the stored URL is not a valid `Location` value
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !is_valid_code(code) {
            return Err(not_found(code));
        }

        let original_url = match self.cache.get_url(code).await {
            Ok(Some(url)) => {
                metrics::counter!("linkshrink_cache_hits_total").increment(1);
                debug!("Cache hit for {}", code);
                url
            }
            Ok(None) => {
                metrics::counter!("linkshrink_cache_misses_total").increment(1);
                debug!("Cache miss for {}", code);
                self.load_and_populate(code).await?
            }
            Err(e) => {
                warn!("Cache read failed for {}, falling back to store: {}", code, e);
                self.load_and_populate(code).await?
            }
        };

        self.record_click(code);
        Ok(original_url)
    }

    async fn load_and_populate(&self, code: &str) -> Result<String, AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))?;

        // Never cache or count a record the redirect handler cannot serve.
        if HeaderValue::from_str(&link.original_url).is_err() {
            warn!("Stored URL for {} is not a valid Location header", code);
            return Err(AppError::internal(
                "Stored URL is not a valid Location header",
                json!({ "code": code }),
            ));
        }

        if let Err(e) = self.cache.put_url(code, &link.original_url).await {
            warn!("Failed to cache {}: {}", code, e);
        }

        Ok(link.original_url)
    }

    fn record_click(&self, code: &str) {
        match self.click_tx.try_send(ClickEvent::new(code)) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => {
                metrics::counter!("linkshrink_click_events_dropped_total").increment(1);
                debug!("Click queue full, dropping event for {}", code);
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Click queue closed, dropping event for {}", code);
            }
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Short link not found", json!({ "code": code }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Link;
    use crate::domain::repositories::MockLinkRepository;
    use crate::infrastructure::cache::{CacheError, CacheResult, MokaCache, NullCache};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::time::Duration;

    struct FailingCache;

    #[async_trait]
    impl CacheService for FailingCache {
        async fn get_url(&self, _code: &str) -> CacheResult<Option<String>> {
            Err(CacheError::ConnectionError("refused".into()))
        }

        async fn put_url(&self, _code: &str, _original_url: &str) -> CacheResult<()> {
            Err(CacheError::ConnectionError("refused".into()))
        }

        async fn health_check(&self) -> bool {
            false
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    fn stored(code: &str) -> Link {
        Link::new(code.to_string(), "https://example.com/x".to_string(), Utc::now())
    }

    fn moka() -> Arc<MokaCache> {
        Arc::new(MokaCache::new(100, Duration::from_secs(60)))
    }

    #[tokio::test]
    async fn test_miss_reads_store_and_populates_cache() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .withf(|code| code == "abc1234")
            .times(1)
            .returning(|c| Ok(Some(stored(c))));

        let cache = moka();
        let (tx, mut rx) = mpsc::channel(8);
        let service = RedirectService::new(Arc::new(repo), cache.clone(), tx);

        let url = service.resolve("abc1234").await.unwrap();

        assert_eq!(url, "https://example.com/x");
        assert_eq!(
            cache.get_url("abc1234").await.unwrap().as_deref(),
            Some("https://example.com/x")
        );
        assert_eq!(rx.try_recv().unwrap(), ClickEvent::new("abc1234"));
    }

    #[tokio::test]
    async fn test_hit_skips_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);

        let cache = moka();
        cache
            .put_url("abc1234", "https://cached.example")
            .await
            .unwrap();
        let (tx, _rx) = mpsc::channel(8);
        let service = RedirectService::new(Arc::new(repo), cache, tx);

        assert_eq!(
            service.resolve("abc1234").await.unwrap(),
            "https://cached.example"
        );
    }

    #[tokio::test]
    async fn test_unknown_code_is_not_cached() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|_| Ok(None));

        let cache = moka();
        let (tx, mut rx) = mpsc::channel(8);
        let service = RedirectService::new(Arc::new(repo), cache.clone(), tx);

        let err = service.resolve("nothere").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(cache.get_url("nothere").await.unwrap().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_invalid_code_shape_touches_nothing() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(0);

        let (tx, _rx) = mpsc::channel(8);
        let service = RedirectService::new(Arc::new(repo), Arc::new(NullCache), tx);

        let err = service.resolve("favicon.ico").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_store_unavailable_maps_to_unavailable() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|_| Err(AppError::unavailable("down", json!({}))));

        let cache = moka();
        let (tx, _rx) = mpsc::channel(8);
        let service = RedirectService::new(Arc::new(repo), cache.clone(), tx);

        let err = service.resolve("abc1234").await.unwrap_err();

        assert!(matches!(err, AppError::Unavailable { .. }));
        assert!(cache.get_url("abc1234").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_cache_failure_falls_back_to_store() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(1)
            .returning(|c| Ok(Some(stored(c))));

        let (tx, _rx) = mpsc::channel(8);
        let service = RedirectService::new(Arc::new(repo), Arc::new(FailingCache), tx);

        assert_eq!(
            service.resolve("abc1234").await.unwrap(),
            "https://example.com/x"
        );
    }

    #[tokio::test]
    async fn test_unservable_stored_url_is_not_cached() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code().times(1).returning(|c| {
            Ok(Some(Link::new(
                c.to_string(),
                "https://example.com/a\nb".to_string(),
                Utc::now(),
            )))
        });

        let cache = moka();
        let (tx, mut rx) = mpsc::channel(8);
        let service = RedirectService::new(Arc::new(repo), cache.clone(), tx);

        let err = service.resolve("abc1234").await.unwrap_err();

        assert!(matches!(err, AppError::Internal { .. }));
        assert!(cache.get_url("abc1234").await.unwrap().is_none());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_click_queue_does_not_fail_redirect() {
        let mut repo = MockLinkRepository::new();
        repo.expect_find_by_code()
            .times(2)
            .returning(|c| Ok(Some(stored(c))));

        let (tx, _rx) = mpsc::channel(1);
        let service = RedirectService::new(Arc::new(repo), Arc::new(NullCache), tx);

        assert!(service.resolve("abc1234").await.is_ok());
        assert!(service.resolve("abc1234").await.is_ok());
    }
}
