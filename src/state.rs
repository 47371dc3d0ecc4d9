//! Shared application state injected into every handler.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{RedirectService, ShortenService, StatsService};
use crate::config::Config;
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::{LinkRepository, StatsRepository};
use crate::infrastructure::cache::CacheService;
use crate::infrastructure::rate_limit::ShortenRateLimiter;
use crate::utils::code_generator::build_generator;

/// Process-wide state, built once at startup and cloned per request.
///
/// Every field is an `Arc` or a channel handle, so cloning is cheap. The
/// cache and the rate-limit table live here and are dropped on shutdown.
#[derive(Clone)]
pub struct AppState {
    pub shorten_service: Arc<ShortenService>,
    pub redirect_service: Arc<RedirectService>,
    pub stats_service: Arc<StatsService>,
    pub links: Arc<dyn LinkRepository>,
    pub cache: Arc<dyn CacheService>,
    pub rate_limiter: Arc<ShortenRateLimiter>,
    pub click_sender: mpsc::Sender<ClickEvent>,
    pub behind_proxy: bool,
    /// Keys trusted as rate-limit identities in `X-Api-Key`.
    pub api_keys: Arc<HashSet<String>>,
}

impl AppState {
    /// Wires services around the given backends using `config` for limits,
    /// code generation and the public base URL.
    pub fn new(
        config: &Config,
        links: Arc<dyn LinkRepository>,
        stats: Arc<dyn StatsRepository>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
    ) -> Self {
        let rate_limiter = Arc::new(ShortenRateLimiter::new(
            NonZeroU32::new(config.rate_limit_per_minute).unwrap_or(NonZeroU32::MIN),
            NonZeroU32::new(config.rate_limit_burst).unwrap_or(NonZeroU32::MIN),
        ));

        let generator = build_generator(config.code_strategy, config.code_length);

        let shorten_service = Arc::new(ShortenService::new(
            links.clone(),
            generator,
            rate_limiter.clone(),
            config.base_url.clone(),
            config.code_max_attempts,
        ));
        let redirect_service = Arc::new(RedirectService::new(
            links.clone(),
            cache.clone(),
            click_sender.clone(),
        ));
        let stats_service = Arc::new(StatsService::new(links.clone(), stats));

        Self {
            shorten_service,
            redirect_service,
            stats_service,
            links,
            cache,
            rate_limiter,
            click_sender,
            behind_proxy: config.behind_proxy,
            api_keys: Arc::new(config.api_keys.iter().cloned().collect()),
        }
    }
}
