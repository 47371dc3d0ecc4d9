//! Short link creation.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::rate_limit::{RateDecision, ShortenRateLimiter};
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validator::validate_url;

/// Default number of codes tried before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// A persisted link together with its public short URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortenedLink {
    pub link: Link,
    pub short_url: String,
}

/// Turns a submitted URL into a persisted short link.
///
/// A request moves through `Received -> RateChecked -> CodeAssigned ->
/// Persisted`. It can exit early with `InvalidUrl` (400), `RateLimited`
/// (429), `GenerationExhausted` (500) or `StoreUnavailable` (503), and a
/// failed request never leaves a partial record behind.
///
/// This service never writes to the cache. Entries appear there only once a
/// redirect has read the record back from the store.
pub struct ShortenService {
    links: Arc<dyn LinkRepository>,
    generator: Arc<dyn CodeGenerator>,
    rate_limiter: Arc<ShortenRateLimiter>,
    base_url: String,
    max_attempts: u32,
}

impl ShortenService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        generator: Arc<dyn CodeGenerator>,
        rate_limiter: Arc<ShortenRateLimiter>,
        base_url: impl Into<String>,
        max_attempts: u32,
    ) -> Self {
        Self {
            links,
            generator,
            rate_limiter,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_attempts: max_attempts.max(1),
        }
    }

    /// Shortens `original_url` on behalf of `client_key`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] if the URL is not an absolute http(s) URL
    /// - [`AppError::RateLimited`] if the client exhausted its budget
    /// - [`AppError::Internal`] if every candidate code collided
    /// - [`AppError::Unavailable`] if the store cannot be reached
    pub async fn shorten(
        &self,
        client_key: &str,
        original_url: &str,
    ) -> Result<ShortenedLink, AppError> {
        let original_url = validate_url(original_url).map_err(|e| {
            AppError::bad_request("Invalid URL", json!({ "reason": e.to_string() }))
        })?;

        if let decision @ RateDecision::Limited { .. } = self.rate_limiter.check(client_key) {
            metrics::counter!("linkshrink_rate_limited_total").increment(1);
            debug!("Rate limited client {}", client_key);
            return Err(AppError::rate_limited(decision.retry_after_secs()));
        }

        let link = self.persist_with_retry(original_url).await?;
        info!("Created short link {} -> {}", link.code, link.original_url);

        Ok(ShortenedLink {
            short_url: self.short_url(&link.code),
            link,
        })
    }

    /// Public URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }

    async fn persist_with_retry(&self, original_url: String) -> Result<Link, AppError> {
        for attempt in 0..self.max_attempts {
            let code = self.generator.generate(&original_url, attempt);
            let new_link = NewLink {
                code: code.clone(),
                original_url: original_url.clone(),
            };

            match self.links.insert(new_link).await {
                Ok(link) => return Ok(link),
                Err(AppError::Conflict { .. }) => {
                    // Hash codes repeat for the same URL; reuse rather than rebind.
                    if let Some(existing) = self.links.find_by_code(&code).await?
                        && existing.original_url == original_url
                    {
                        debug!("Reusing existing code {} for {}", code, original_url);
                        return Ok(existing);
                    }

                    metrics::counter!("linkshrink_code_collisions_total").increment(1);
                    debug!("Code {} collided on attempt {}", code, attempt + 1);
                }
                Err(e) => return Err(e),
            }
        }

        warn!(
            "Code generation exhausted after {} attempts",
            self.max_attempts
        );
        Err(AppError::internal(
            "Failed to generate unique code",
            json!({ "reason": "generation_exhausted", "attempts": self.max_attempts }),
        ))
    }
}
