//! Periodic eviction of expired records

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::metrics::ServiceMetrics;
use crate::store::MemoryStore;

/// Run `evict_expired` every `interval` until the task is aborted.
pub fn spawn(store: Arc<MemoryStore>, metrics: ServiceMetrics, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let swept = store.evict_expired();
            metrics.set_stored(store.len());
            if swept > 0 {
                metrics.swept.inc_by(swept as u64);
                tracing::info!(swept, remaining = store.len(), "evicted expired secrets");
            }
        }
    })
}
