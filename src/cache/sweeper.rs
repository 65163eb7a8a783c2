//! Background expiry sweep
//!
//! Entries already expire passively when read; the sweep bounds memory by
//! dropping entries nobody asks for again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use super::ForecastCache;

/// Default sweep interval, independent of the TTLs
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(320);

/// Handle for controlling the background sweep task
pub struct SweepHandle {
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Spawns a task that purges expired entries every `interval`
    pub fn spawn(cache: Arc<ForecastCache>, interval: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Skip the first tick (immediate)
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let removed = cache.purge_expired();
                        debug!(
                            "Cache sweep removed {} entries, {} remain",
                            removed,
                            cache.store().len()
                        );
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Self { shutdown_tx, task }
    }

    /// Stops the sweep and waits for the task to finish
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(()).await;
        let _ = self.task.await;
    }
}
