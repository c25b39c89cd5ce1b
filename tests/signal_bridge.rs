// Raises real SIGTERM/SIGINT at the test process and changes signal
// dispositions; kept alone in its own binary.

mod common;
use crate::common::{TestResult, init_tracing, with_timeout};

use apptest::engine::{BridgedSignal, SignalBridge, StopReason, StopRequest};
use nix::sys::signal::{SaFlags, SigAction, SigHandler, SigSet, Signal, kill, sigaction};
use nix::unistd::getpid;

/// Current handler for `sig`, read by swapping an action in and straight back.
fn disposition(sig: Signal) -> nix::Result<SigHandler> {
    let placeholder = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    // SAFETY: the previous action is reinstated immediately.
    let current = unsafe { sigaction(sig, &placeholder)? };
    unsafe { sigaction(sig, &current)? };
    Ok(current.handler())
}

fn is_default(sig: Signal) -> nix::Result<bool> {
    Ok(matches!(disposition(sig)?, SigHandler::SigDfl))
}

fn is_ignored(sig: Signal) -> nix::Result<bool> {
    Ok(matches!(disposition(sig)?, SigHandler::SigIgn))
}

fn is_intercepted(sig: Signal) -> nix::Result<bool> {
    Ok(matches!(disposition(sig)?, SigHandler::Handler(_)))
}

#[tokio::test]
async fn bridge_owns_dispositions_only_while_installed() -> TestResult {
    init_tracing();

    // A non-default prior disposition makes the restore observable.
    let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
    // SAFETY: installs SIG_IGN, no handler code involved.
    unsafe { sigaction(Signal::SIGTERM, &ignore)? };
    assert!(is_ignored(Signal::SIGTERM)?);
    assert!(is_default(Signal::SIGINT)?);

    // First run: SIGTERM is delivered.
    let stop = StopRequest::new();
    let bridge = SignalBridge::install(stop.clone())?;
    assert!(is_intercepted(Signal::SIGINT)?);
    assert!(is_intercepted(Signal::SIGTERM)?);

    kill(getpid(), Signal::SIGTERM)?;
    let reason = with_timeout(stop.requested()).await;
    assert_eq!(reason, StopReason::Signal(BridgedSignal::Terminate));

    // The delivered signal falls back to the default so a second one is fatal;
    // the other one is still intercepted.
    assert!(is_default(Signal::SIGTERM)?);
    assert!(is_intercepted(Signal::SIGINT)?);

    bridge.retire();
    assert!(is_ignored(Signal::SIGTERM)?);
    assert!(is_default(Signal::SIGINT)?);

    // Second run: a fresh bridge intercepts again.
    let stop = StopRequest::new();
    let bridge = SignalBridge::install(stop.clone())?;
    assert!(is_intercepted(Signal::SIGINT)?);

    kill(getpid(), Signal::SIGINT)?;
    let reason = with_timeout(stop.requested()).await;
    assert_eq!(reason, StopReason::Signal(BridgedSignal::Interrupt));
    assert!(is_default(Signal::SIGINT)?);

    drop(bridge);
    assert!(is_default(Signal::SIGINT)?);
    assert!(is_ignored(Signal::SIGTERM)?);

    let default = SigAction::new(SigHandler::SigDfl, SaFlags::empty(), SigSet::empty());
    // SAFETY: installs SIG_DFL, no handler code involved.
    unsafe { sigaction(Signal::SIGTERM, &default)? };
    Ok(())
}
