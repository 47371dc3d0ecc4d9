//! HTTP server initialization and runtime setup.
//!
//! Builds the store and cache backends, spawns background workers and runs
//! the Axum server until a shutdown signal arrives.

use crate::config::{CacheBackend, Config};
use crate::domain::click_worker::run_click_worker;
use crate::domain::repositories::{LinkRepository, StatsRepository};
use crate::infrastructure::cache::{CacheService, MokaCache, NullCache, RedisCache};
use crate::infrastructure::persistence::{
    InMemoryLinkRepository, InMemoryStatsRepository, PgLinkRepository, PgStatsRepository,
};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc;

/// How often pending click counts are written.
const CLICK_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// How often idle rate-limit buckets are dropped.
const RATE_LIMIT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound on the final click flush after the server stops.
const SHUTDOWN_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL pool and migrations, or the in-memory store
/// - moka, Redis or no-op cache
/// - Background click worker and rate-limit sweeper
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if the database is configured but unreachable, if
/// migrations fail, or if the listener cannot bind.
pub async fn run(config: Config) -> Result<()> {
    let (links, stats) = build_store(&config).await?;
    let cache = build_cache(&config).await;

    let (click_tx, click_rx) = mpsc::channel(config.click_queue_capacity);
    let click_worker = tokio::spawn(run_click_worker(
        click_rx,
        stats.clone(),
        CLICK_FLUSH_INTERVAL,
    ));
    tracing::info!("Click worker started");

    let state = AppState::new(&config, links, stats, cache, click_tx);
    let sweeper = state
        .rate_limiter
        .clone()
        .spawn_sweeper(RATE_LIMIT_SWEEP_INTERVAL);

    let app = app_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid LISTEN address '{}'", config.listen_addr))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    // The router held the last click senders; the worker now drains and exits.
    sweeper.abort();
    match tokio::time::timeout(SHUTDOWN_FLUSH_TIMEOUT, click_worker).await {
        Ok(_) => tracing::info!("Click counters flushed"),
        Err(_) => tracing::warn!("Timed out flushing click counters"),
    }

    Ok(())
}

/// Connects the durable store, falling back to memory when no database is configured.
async fn build_store(
    config: &Config,
) -> Result<(Arc<dyn LinkRepository>, Arc<dyn StatsRepository>)> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set, links are kept in memory and lost on restart");
        return Ok((
            Arc::new(InMemoryLinkRepository::new()),
            Arc::new(InMemoryStatsRepository::new()),
        ));
    };

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    let pool = Arc::new(pool);
    Ok((
        Arc::new(PgLinkRepository::new(pool.clone())),
        Arc::new(PgStatsRepository::new(pool)),
    ))
}

/// Builds the configured cache. An unreachable Redis degrades to no caching.
async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    match (config.cache_backend, config.redis_url.as_deref()) {
        (CacheBackend::Redis, Some(redis_url)) => {
            match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
                Ok(redis) => {
                    tracing::info!("Cache enabled (Redis)");
                    Arc::new(redis)
                }
                Err(e) => {
                    tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                    Arc::new(NullCache::new())
                }
            }
        }
        (CacheBackend::Memory, _) => {
            tracing::info!(
                "Cache enabled (in-process, {} entries)",
                config.cache_capacity
            );
            Arc::new(MokaCache::new(
                config.cache_capacity,
                Duration::from_secs(config.cache_ttl_seconds),
            ))
        }
        _ => {
            tracing::info!("Cache disabled (NullCache)");
            Arc::new(NullCache::new())
        }
    }
}

/// Resolves on Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("Shutdown signal received, draining in-flight requests");
}
