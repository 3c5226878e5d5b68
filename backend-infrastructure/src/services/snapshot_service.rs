use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::repositories::MemoryStore;

/// Periodically flushes the memory store to disk. An interval of zero
/// disables the schedule; the store is still flushed on shutdown.
pub async fn schedule_snapshots(store: Arc<MemoryStore>, interval_seconds: u64) {
    if interval_seconds == 0 || store.snapshot_path().is_none() {
        return;
    }
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_seconds));
    ticker.tick().await;
    loop {
        ticker.tick().await;
        if let Err(err) = store.persist().await {
            error!("snapshot failed: {:#}", err);
        }
    }
}

pub async fn flush_snapshot(store: &MemoryStore) {
    match store.persist().await {
        Ok(true) => info!("final snapshot written"),
        Ok(false) => {}
        Err(err) => error!("final snapshot failed: {:#}", err),
    }
}
