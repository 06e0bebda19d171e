//! Periodic device reconciliation.
//!
//! Mounts are polled on a coarse interval. The model owns a
//! [`ReconcileTimer`] that is stopped while a reload or a reconciliation runs
//! and restarted when it completes, so ticks that arrive in between do not
//! reconcile a half-built list.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::{MissedTickBehavior, interval};

use super::model::{BookmarksModel, TickReport};

/// Reference cadence of mount polling.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Start/stop state of the reconciliation timer.
#[derive(Debug, Clone)]
pub struct ReconcileTimer {
    period: Duration,
    running: bool,
}

impl ReconcileTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            running: false,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop the timer. Returns whether it was running.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

impl Default for ReconcileTimer {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

/// Drive `model` with one tick per timer period, forever.
///
/// Ticks touch the filesystem and the mount table, so they run on the
/// blocking pool. Each report is handed to `on_tick` after the model lock is
/// released.
pub async fn run_polling<F>(model: Arc<Mutex<BookmarksModel>>, mut on_tick: F)
where
    F: FnMut(&TickReport),
{
    let period = model.lock().timer().period();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    crate::debug_event!("poller", "started", "every {period:?}");
    loop {
        ticker.tick().await;
        let shared = Arc::clone(&model);
        let tick = tokio::task::spawn_blocking(move || BookmarksModel::edit(&shared, BookmarksModel::tick));
        let report = match tick.await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!("[poller] tick failed: {e}");
                continue;
            }
        };
        if !report.is_empty() {
            crate::debug_event!("poller", "tick", "{report:?}");
        }
        on_tick(&report);
    }
}
