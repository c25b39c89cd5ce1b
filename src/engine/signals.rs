// src/engine/signals.rs

//! Converts SIGINT/SIGTERM aimed at the harness into a [`StopRequest`].
//!
//! The bridge is a guard scoped to one run. While at least one bridge is
//! alive the harness owns the disposition of both signals:
//! - installing the first bridge saves the prior `sigaction` of each signal
//!   and installs a handler that only writes the signal number to a wake
//!   pipe;
//! - the handler is installed with `SA_RESETHAND`, so the first delivery puts
//!   the signal back to `SIG_DFL` and a second Ctrl-C kills the harness
//!   outright if the application refuses to shut down;
//! - dropping the last bridge restores the saved prior actions.
//!
//! A dispatcher thread reads the wake pipe and issues the stop request of
//! every live bridge. Signal handlers can only reach process-global state, so
//! the registry of live bridges is a static.

use std::fmt;
use std::io::Read;
use std::os::fd::IntoRawFd;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use nix::libc;
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, sigaction};
use tracing::{debug, info, warn};

use crate::engine::stop::{StopReason, StopRequest};

/// Signals the bridge listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgedSignal {
    Interrupt,
    Terminate,
}

impl BridgedSignal {
    pub const ALL: [BridgedSignal; 2] = [BridgedSignal::Interrupt, BridgedSignal::Terminate];

    pub fn signal(self) -> Signal {
        match self {
            BridgedSignal::Interrupt => Signal::SIGINT,
            BridgedSignal::Terminate => Signal::SIGTERM,
        }
    }

    fn from_raw(signum: i32) -> Option<Self> {
        match Signal::try_from(signum).ok()? {
            Signal::SIGINT => Some(BridgedSignal::Interrupt),
            Signal::SIGTERM => Some(BridgedSignal::Terminate),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            BridgedSignal::Interrupt => 0,
            BridgedSignal::Terminate => 1,
        }
    }
}

impl fmt::Display for BridgedSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.signal().as_str())
    }
}

/// Write end of the wake pipe, `-1` until the dispatcher is started.
static WAKE_FD: AtomicI32 = AtomicI32::new(-1);

static REGISTRY: Mutex<Registry> = Mutex::new(Registry {
    next_id: 0,
    live: Vec::new(),
    prior: None,
});

struct Registry {
    next_id: u64,
    live: Vec<(u64, StopRequest)>,
    /// Dispositions in effect before the first live bridge was installed.
    prior: Option<[SigAction; 2]>,
}

fn registry() -> MutexGuard<'static, Registry> {
    REGISTRY.lock().unwrap_or_else(PoisonError::into_inner)
}

extern "C" fn forward_signal(signum: libc::c_int) {
    let fd = WAKE_FD.load(Ordering::SeqCst);
    if fd >= 0 {
        let byte = signum as u8;
        // SAFETY: write() is async-signal-safe; `fd` is the leaked write end
        // of the wake pipe and stays open for the life of the process.
        unsafe {
            libc::write(fd, (&byte as *const u8).cast(), 1);
        }
    }
}

/// Active signal interception for one run. Dropping the bridge retires it.
#[derive(Debug)]
pub struct SignalBridge {
    id: u64,
}

impl SignalBridge {
    /// Take over SIGINT and SIGTERM until the bridge is dropped.
    pub fn install(stop: StopRequest) -> std::io::Result<Self> {
        let mut registry = registry();
        start_dispatcher()?;

        let action = SigAction::new(
            SigHandler::Handler(forward_signal),
            SaFlags::SA_RESTART | SaFlags::SA_RESETHAND,
            SigSet::empty(),
        );

        // Re-arm on every install: an earlier delivery may have reset the
        // disposition while other bridges were still live.
        let mut replaced = Vec::with_capacity(BridgedSignal::ALL.len());
        for bridged in BridgedSignal::ALL {
            // SAFETY: the handler only performs an async-signal-safe write.
            match unsafe { sigaction(bridged.signal(), &action) } {
                Ok(old) => replaced.push(old),
                Err(e) => {
                    if registry.live.is_empty() {
                        for (old, undo) in replaced.iter().zip(BridgedSignal::ALL) {
                            // SAFETY: reinstating the action that was in place.
                            let _ = unsafe { sigaction(undo.signal(), old) };
                        }
                    }
                    return Err(e.into());
                }
            }
        }

        if registry.live.is_empty() {
            registry.prior = Some([replaced[0], replaced[1]]);
        }

        let id = registry.next_id;
        registry.next_id += 1;
        registry.live.push((id, stop));

        debug!(id, live = registry.live.len(), "signal bridge installed");
        Ok(Self { id })
    }

    /// Stop intercepting. Equivalent to dropping the bridge.
    pub fn retire(self) {}
}

impl Drop for SignalBridge {
    fn drop(&mut self) {
        let mut registry = registry();
        registry.live.retain(|(id, _)| *id != self.id);

        if !registry.live.is_empty() {
            debug!(id = self.id, "signal bridge retired");
            return;
        }
        if let Some(prior) = registry.prior.take() {
            for bridged in BridgedSignal::ALL {
                // SAFETY: reinstating the action that was in place before the
                // first bridge was installed.
                if let Err(e) = unsafe { sigaction(bridged.signal(), &prior[bridged.index()]) } {
                    warn!(signal = %bridged, error = %e, "failed to restore prior signal disposition");
                }
            }
            debug!("prior signal dispositions restored");
        }
        debug!(id = self.id, "signal bridge retired");
    }
}

/// Start the dispatcher thread once per process. Called with the registry
/// lock held.
fn start_dispatcher() -> std::io::Result<()> {
    if WAKE_FD.load(Ordering::SeqCst) >= 0 {
        return Ok(());
    }

    let (reader, writer) = std::io::pipe()?;
    std::thread::Builder::new()
        .name("apptest-signals".to_string())
        .spawn(move || dispatch(reader))?;
    WAKE_FD.store(writer.into_raw_fd(), Ordering::SeqCst);
    Ok(())
}

fn dispatch(mut reader: std::io::PipeReader) {
    let mut buf = [0u8; 16];
    loop {
        match reader.read(&mut buf) {
            Ok(0) => return,
            Ok(n) => {
                for &byte in &buf[..n] {
                    if let Some(bridged) = BridgedSignal::from_raw(i32::from(byte)) {
                        deliver(bridged);
                    }
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!(error = %e, "signal wake pipe failed; signals are no longer bridged");
                return;
            }
        }
    }
}

fn deliver(bridged: BridgedSignal) {
    let registry = registry();
    if registry.live.is_empty() {
        debug!(signal = %bridged, "signal arrived with no live bridge");
        return;
    }
    info!(signal = %bridged, "signal received; requesting graceful stop");
    for (_, stop) in &registry.live {
        stop.issue(StopReason::Signal(bridged));
    }
}
