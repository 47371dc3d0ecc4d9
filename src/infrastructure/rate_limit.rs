//! Per-client admission control for the shorten endpoint.
//!
//! Backed by `governor`'s keyed GCRA limiter, which is equivalent to a token
//! bucket: each client key may spend `burst` requests at once and regains one
//! every `60s / per_minute`. Per-key state is a single atomic word updated
//! with compare-and-swap inside a sharded `DashMap`, so clients never contend
//! on a global lock and a rejection costs one map lookup.

use governor::clock::{Clock, DefaultClock};
use governor::state::keyed::DefaultKeyedStateStore;
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::debug;

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed,
    Limited { retry_after: Duration },
}

impl RateDecision {
    /// Whole seconds a client should wait, rounded up and at least one.
    pub fn retry_after_secs(&self) -> u64 {
        match self {
            Self::Allowed => 0,
            Self::Limited { retry_after } => {
                let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
                secs.max(1)
            }
        }
    }
}

/// Token-bucket limiter keyed by client (IP or API key).
///
/// Buckets are created lazily on a client's first request and live only in
/// memory; losing them on restart merely resets budgets.
pub struct ShortenRateLimiter {
    limiter: KeyedLimiter,
}

impl ShortenRateLimiter {
    /// Creates a limiter granting `burst` immediate requests per client,
    /// replenished at `per_minute` per minute.
    pub fn new(per_minute: NonZeroU32, burst: NonZeroU32) -> Self {
        let quota = Quota::per_minute(per_minute).allow_burst(burst);
        Self {
            limiter: RateLimiter::keyed(quota),
        }
    }

    /// Consumes one token for `client_key` if available.
    pub fn check(&self, client_key: &str) -> RateDecision {
        match self.limiter.check_key(&client_key.to_string()) {
            Ok(()) => RateDecision::Allowed,
            Err(not_until) => RateDecision::Limited {
                retry_after: not_until.wait_time_from(self.limiter.clock().now()),
            },
        }
    }

    /// Returns true and consumes a token if `client_key` is within budget.
    pub fn allow(&self, client_key: &str) -> bool {
        self.check(client_key) == RateDecision::Allowed
    }

    /// Number of client buckets currently tracked.
    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Drops buckets that have fully refilled, since they are
    /// indistinguishable from fresh ones.
    pub fn sweep(&self) {
        let before = self.limiter.len();
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
        debug!(
            "Rate limiter sweep: {} -> {} tracked clients",
            before,
            self.limiter.len()
        );
    }

    /// Runs [`Self::sweep`] every `interval` until the task is aborted.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.sweep();
            }
        })
    }
}
