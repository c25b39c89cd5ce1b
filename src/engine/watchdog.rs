// src/engine/watchdog.rs

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

/// One-shot deferred action enforcing a maximum run duration.
///
/// `on_fire` runs once after the duration elapses unless the watchdog is
/// cancelled (or dropped) first. Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct Watchdog {
    fired: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Watchdog {
    pub fn arm<F>(duration: Duration, on_fire: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let handle = tokio::spawn(async move {
            sleep(duration).await;
            flag.store(true, Ordering::SeqCst);
            warn!(?duration, "maximum run duration elapsed");
            on_fire();
        });

        debug!(?duration, "watchdog armed");
        Self {
            fired,
            handle: Some(handle),
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired.load(Ordering::SeqCst)
    }

    /// Disarm. A no-op if the watchdog already fired.
    pub fn cancel(mut self) {
        self.disarm();
    }

    fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            if self.has_fired() {
                debug!("watchdog already fired; cancel is a no-op");
            } else {
                debug!("watchdog cancelled");
            }
            handle.abort();
        }
    }
}

impl Drop for Watchdog {
    fn drop(&mut self) {
        self.disarm();
    }
}
