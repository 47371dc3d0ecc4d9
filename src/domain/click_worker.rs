//! Background worker that aggregates click events and flushes counters.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::StatsRepository;

/// Distinct codes buffered before an early flush.
const MAX_PENDING_CODES: usize = 1_000;

/// Retries per counter write before the increment is dropped.
const FLUSH_RETRIES: usize = 3;

/// Consumes click events until the channel closes.
///
/// Events are folded into per-code increments and written every
/// `flush_interval` (or earlier once [`MAX_PENDING_CODES`] codes are pending).
/// Each write is retried with jittered exponential backoff; an increment that
/// still fails is logged and dropped. Remaining counts are flushed when every
/// sender has been dropped.
pub async fn run_click_worker(
    mut rx: mpsc::Receiver<ClickEvent>,
    stats: Arc<dyn StatsRepository>,
    flush_interval: Duration,
) {
    let mut pending: HashMap<String, u64> = HashMap::new();
    let mut ticker =
        tokio::time::interval_at(tokio::time::Instant::now() + flush_interval, flush_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(ev) => {
                    *pending.entry(ev.code).or_insert(0) += 1;
                    if pending.len() >= MAX_PENDING_CODES {
                        flush(&mut pending, stats.as_ref()).await;
                    }
                }
                None => {
                    flush(&mut pending, stats.as_ref()).await;
                    info!("Click worker stopped");
                    break;
                }
            },
            _ = ticker.tick() => {
                flush(&mut pending, stats.as_ref()).await;
            }
        }
    }
}

async fn flush(pending: &mut HashMap<String, u64>, stats: &dyn StatsRepository) {
    if pending.is_empty() {
        return;
    }

    debug!("Flushing click counters for {} codes", pending.len());

    for (code, clicks) in pending.drain() {
        let strategy = ExponentialBackoff::from_millis(10)
            .map(jitter)
            .take(FLUSH_RETRIES);

        let result = Retry::start(strategy, || stats.increment_clicks(&code, clicks)).await;

        if let Err(e) = result {
            metrics::counter!("linkshrink_clicks_dropped_total").increment(clicks);
            warn!("Dropping {} clicks for {}: {}", clicks, code, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockStatsRepository;
    use crate::error::AppError;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_worker_aggregates_and_flushes_on_close() {
        let mut mock = MockStatsRepository::new();
        mock.expect_increment_clicks()
            .withf(|code, clicks| code == "abc1234" && *clicks == 3)
            .times(1)
            .returning(|_, _| Ok(()));
        mock.expect_increment_clicks()
            .withf(|code, clicks| code == "zzz9999" && *clicks == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let (tx, rx) = mpsc::channel(16);
        for code in ["abc1234", "abc1234", "zzz9999", "abc1234"] {
            tx.send(ClickEvent::new(code)).await.unwrap();
        }
        drop(tx);

        run_click_worker(rx, Arc::new(mock), Duration::from_secs(3600)).await;
    }

    #[tokio::test]
    async fn test_worker_retries_failed_flush() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let mut mock = MockStatsRepository::new();
        mock.expect_increment_clicks()
            .times(2)
            .returning(move |_, _| {
                if calls_clone.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(AppError::unavailable("down", json!({})))
                } else {
                    Ok(())
                }
            });

        let (tx, rx) = mpsc::channel(4);
        tx.send(ClickEvent::new("retry01")).await.unwrap();
        drop(tx);

        run_click_worker(rx, Arc::new(mock), Duration::from_secs(3600)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_worker_with_no_events_does_not_write() {
        let mut mock = MockStatsRepository::new();
        mock.expect_increment_clicks().times(0);

        let (tx, rx) = mpsc::channel::<ClickEvent>(4);
        drop(tx);

        run_click_worker(rx, Arc::new(mock), Duration::from_secs(3600)).await;
    }
}
