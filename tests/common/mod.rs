#![allow(dead_code)]

use axum::{Router, extract::ConnectInfo};
use axum_test::TestServer;
use linkshrink::config::Config;
use linkshrink::domain::click_event::ClickEvent;
use linkshrink::infrastructure::cache::MokaCache;
use linkshrink::infrastructure::persistence::{InMemoryLinkRepository, InMemoryStatsRepository};
use linkshrink::routes;
use linkshrink::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tower::Layer;

pub const BASE_URL: &str = "http://sho.rt";

/// Handles to the backends behind a test [`AppState`].
pub struct TestApp {
    pub state: AppState,
    pub links: Arc<InMemoryLinkRepository>,
    pub stats: Arc<InMemoryStatsRepository>,
    pub cache: Arc<MokaCache>,
    pub click_rx: mpsc::Receiver<ClickEvent>,
}

pub fn test_config() -> Config {
    Config {
        base_url: BASE_URL.to_string(),
        click_queue_capacity: 2_000,
        ..Config::default()
    }
}

pub fn create_test_app(config: Config) -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::new());
    let stats = Arc::new(InMemoryStatsRepository::new());
    let cache = Arc::new(MokaCache::new(
        config.cache_capacity,
        Duration::from_secs(config.cache_ttl_seconds),
    ));
    let (tx, rx) = mpsc::channel(config.click_queue_capacity);

    let state = AppState::new(&config, links.clone(), stats.clone(), cache.clone(), tx);

    TestApp {
        state,
        links,
        stats,
        cache,
        click_rx: rx,
    }
}

/// Full application router with a fixed peer address.
pub fn test_router(state: AppState) -> Router {
    routes::router(state).layer(MockConnectInfoLayer)
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(test_router(state)).unwrap()
}

/// Inserts `ConnectInfo` so handlers that read the peer address work
/// without a real socket.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
