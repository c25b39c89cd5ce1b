// Sends SIGINT to the test process mid-run; kept alone in its own binary.

mod common;
use crate::common::{RecordingConsole, RunConfigurationBuilder, TestApp, TestResult, init_tracing, with_timeout};

use std::time::Duration;

use apptest::engine::{BridgedSignal, StopReason, Supervisor};
use apptest::types::RunResult;
use nix::sys::signal::{SigHandler, Signal, kill, signal};
use nix::unistd::getpid;
use tokio::time::sleep;

const GRACEFUL_APP: &str = "trap 'echo interrupted; exit 0' TERM
echo started
while true; do sleep 0.1; done";

async fn run_interrupted(app: &TestApp) -> Result<(RunResult, RecordingConsole, Option<StopReason>), Box<dyn std::error::Error>> {
    let config = RunConfigurationBuilder::for_script(app).build();
    let console = RecordingConsole::new();

    let supervisor = Supervisor::new(config, console.clone());
    let stop = supervisor.stop_handle();
    let run = tokio::spawn(supervisor.run());

    sleep(Duration::from_millis(500)).await;
    kill(getpid(), Signal::SIGINT)?;

    let result = with_timeout(run).await?;
    Ok((result, console, stop.reason()))
}

#[tokio::test]
async fn every_run_turns_interrupt_into_graceful_stop() -> TestResult {
    init_tracing();
    let app = TestApp::new(GRACEFUL_APP);

    for run in 1..=2 {
        let (result, console, reason) = run_interrupted(&app).await?;

        assert_eq!(result, RunResult::Passed, "run {run}");
        assert_eq!(reason, Some(StopReason::Signal(BridgedSignal::Interrupt)), "run {run}");
        assert!(console.contains("Sending shutdown request to the application."), "run {run}");
        assert!(console.contains("interrupted"), "run {run}");
        assert!(console.lines().iter().all(|l| !l.starts_with("Maximum test duration")));
        assert_eq!(console.last().as_deref(), Some("Test result: success"));
    }

    // Nothing stays installed once the runs are over.
    // SAFETY: installs SIG_DFL and reads back the previous handler.
    let previous = unsafe { signal(Signal::SIGINT, SigHandler::SigDfl)? };
    assert!(matches!(previous, SigHandler::SigDfl));
    Ok(())
}
