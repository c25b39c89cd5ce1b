// src/engine/stop.rs

use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::sync::Notify;

use crate::engine::signals::BridgedSignal;

/// Who asked the application to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The watchdog's maximum run duration elapsed.
    Timeout(Duration),
    /// The harness received SIGINT or SIGTERM.
    Signal(BridgedSignal),
    /// An embedding caller asked for the stop through
    /// [`Supervisor::stop_handle`](crate::engine::Supervisor::stop_handle).
    Requested,
}

/// Single-fire "ask the application to terminate" flag.
///
/// Cloned into the watchdog and the signal bridge; only the supervisor's
/// control loop waits on it. The first [`issue`](Self::issue) wins, later
/// ones are no-ops.
#[derive(Debug, Clone, Default)]
pub struct StopRequest {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    reason: OnceLock<StopReason>,
    notify: Notify,
}

impl StopRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a stop. Returns `true` only for the call that set it.
    pub fn issue(&self, reason: StopReason) -> bool {
        let first = self.inner.reason.set(reason).is_ok();
        if first {
            self.inner.notify.notify_one();
        }
        first
    }

    /// The reason of the first issuer, if any.
    pub fn reason(&self) -> Option<StopReason> {
        self.inner.reason.get().copied()
    }

    pub fn is_issued(&self) -> bool {
        self.inner.reason.get().is_some()
    }

    /// Resolve once a stop has been issued.
    pub async fn requested(&self) -> StopReason {
        loop {
            if let Some(reason) = self.reason() {
                return reason;
            }
            self.inner.notify.notified().await;
        }
    }
}
