// src/engine/core.rs

//! Pure supervisor state machine.
//!
//! [`SupervisorCore`] consumes [`SupervisorEvent`]s and produces a
//! [`CoreStep`]: the commands the async shell
//! ([`crate::engine::supervisor::Supervisor`]) must carry out, and the
//! terminal result once there is one.
//!
//! The core owns no channels, processes or timers, so the whole lifecycle can
//! be unit tested by feeding events by hand.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::classify::{Classification, OutputClassifier};
use crate::engine::evaluate::evaluate;
use crate::engine::stop::StopReason;
use crate::types::RunResult;

/// Lifecycle of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Nothing launched yet.
    Idle,
    /// Application running; watchdog armed, signal bridge installed.
    Running,
    /// Termination requested; still draining output until the exit.
    Draining,
    /// Exit code observed and evaluated.
    Terminated,
    /// Ended early with an execution error (launch failure or interrupted
    /// wait).
    Aborted,
}

impl LifecycleState {
    pub fn is_final(self) -> bool {
        matches!(self, LifecycleState::Terminated | LifecycleState::Aborted)
    }

    /// Whether an application process is alive from the supervisor's view.
    pub fn is_active(self) -> bool {
        matches!(self, LifecycleState::Running | LifecycleState::Draining)
    }
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    /// The application process was started.
    Launched,
    /// The application could not be started.
    LaunchFailed { reason: String },
    /// A non-empty output line.
    Line(String),
    /// Someone asked the application to stop.
    StopRequested(StopReason),
    /// Output drained and the exit code is known.
    Exited { code: i32 },
    /// The supervisor's own wait failed.
    Interrupted { reason: String },
}

/// Side effects requested by the core, executed in order by the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorCommand {
    /// Write one line to the console.
    Print(String),
    ArmWatchdog(Duration),
    InstallSignalBridge,
    /// Send SIGTERM to the application.
    TerminateChild,
    CancelWatchdog,
    RetireSignalBridge,
    /// Drop the process handle.
    ReleaseChild,
}

/// Output of one [`SupervisorCore::step`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreStep {
    pub commands: Vec<SupervisorCommand>,
    /// Set exactly once, on the transition into a final state.
    pub result: Option<RunResult>,
}

/// Console line announcing the overall verdict.
pub fn result_line(result: RunResult) -> &'static str {
    if result.is_success() {
        "Test result: success"
    } else {
        "Test result: FAIL"
    }
}

pub struct SupervisorCore {
    state: LifecycleState,
    timeout: Duration,
    classifier: Box<dyn OutputClassifier>,
    classification: Classification,
}

impl SupervisorCore {
    pub fn new(timeout: Duration, classifier: Box<dyn OutputClassifier>) -> Self {
        Self {
            state: LifecycleState::Idle,
            timeout,
            classifier,
            classification: Classification::default(),
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn classification(&self) -> &Classification {
        &self.classification
    }

    /// Handle a single event, updating state and returning the commands for
    /// the shell.
    pub fn step(&mut self, event: SupervisorEvent) -> CoreStep {
        if self.state.is_final() {
            debug!(?event, state = ?self.state, "event after terminal state ignored");
            return CoreStep::default();
        }

        match event {
            SupervisorEvent::Launched => self.on_launched(),
            SupervisorEvent::LaunchFailed { reason } => self.on_launch_failed(reason),
            SupervisorEvent::Line(line) => self.on_line(line),
            SupervisorEvent::StopRequested(reason) => self.on_stop(reason),
            SupervisorEvent::Exited { code } => self.on_exit(code),
            SupervisorEvent::Interrupted { reason } => self.on_interrupted(reason),
        }
    }

    fn on_launched(&mut self) -> CoreStep {
        if self.state != LifecycleState::Idle {
            warn!(state = ?self.state, "duplicate launch event ignored");
            return CoreStep::default();
        }
        self.state = LifecycleState::Running;
        CoreStep {
            commands: vec![
                SupervisorCommand::InstallSignalBridge,
                SupervisorCommand::ArmWatchdog(self.timeout),
            ],
            result: None,
        }
    }

    fn on_launch_failed(&mut self, reason: String) -> CoreStep {
        if self.state != LifecycleState::Idle {
            warn!(state = ?self.state, "launch failure reported after launch; ignored");
            return CoreStep::default();
        }
        self.state = LifecycleState::Aborted;
        CoreStep {
            commands: vec![
                SupervisorCommand::Print(format!("Unable to start the application: {reason}")),
                SupervisorCommand::Print(result_line(RunResult::ExecutionError).to_string()),
            ],
            result: Some(RunResult::ExecutionError),
        }
    }

    fn on_line(&mut self, line: String) -> CoreStep {
        if !self.state.is_active() {
            debug!(state = ?self.state, "output line without a running application ignored");
            return CoreStep::default();
        }
        let reason = self.classifier.classify(&line);
        let step = CoreStep {
            commands: vec![SupervisorCommand::Print(line)],
            result: None,
        };
        if let Some(reason) = reason {
            info!(%reason, "output classified as failure");
            self.classification.record_failure(reason);
        }
        step
    }

    fn on_stop(&mut self, reason: StopReason) -> CoreStep {
        if self.state != LifecycleState::Running {
            debug!(?reason, state = ?self.state, "stop request ignored");
            return CoreStep::default();
        }
        self.state = LifecycleState::Draining;

        let mut commands = Vec::with_capacity(3);
        if let StopReason::Timeout(duration) = reason {
            commands.push(SupervisorCommand::Print(format!(
                "Maximum test duration ({:.1} sec) elapsed.",
                duration.as_secs_f64()
            )));
        }
        commands.push(SupervisorCommand::Print(
            "Sending shutdown request to the application.".to_string(),
        ));
        commands.push(SupervisorCommand::TerminateChild);

        CoreStep {
            commands,
            result: None,
        }
    }

    fn on_exit(&mut self, code: i32) -> CoreStep {
        if !self.state.is_active() {
            warn!(code, state = ?self.state, "exit reported without a running application");
            return CoreStep::default();
        }
        self.state = LifecycleState::Terminated;

        let evaluation = evaluate(code, &self.classification);
        info!(exit_code = code, result = %evaluation.result, "application terminated");

        let mut commands = vec![
            SupervisorCommand::CancelWatchdog,
            SupervisorCommand::RetireSignalBridge,
            SupervisorCommand::ReleaseChild,
        ];
        if let Some(message) = evaluation.message {
            commands.push(SupervisorCommand::Print(message));
        }
        commands.push(SupervisorCommand::Print(
            result_line(evaluation.result).to_string(),
        ));

        CoreStep {
            commands,
            result: Some(evaluation.result),
        }
    }

    fn on_interrupted(&mut self, reason: String) -> CoreStep {
        warn!(%reason, state = ?self.state, "supervisor wait interrupted");
        self.state = LifecycleState::Aborted;
        CoreStep {
            commands: vec![
                SupervisorCommand::Print("Execution interrupted unexpectedly.".to_string()),
                SupervisorCommand::CancelWatchdog,
                SupervisorCommand::RetireSignalBridge,
                SupervisorCommand::ReleaseChild,
            ],
            result: Some(RunResult::ExecutionError),
        }
    }
}

impl std::fmt::Debug for SupervisorCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SupervisorCore")
            .field("state", &self.state)
            .field("timeout", &self.timeout)
            .field("classification", &self.classification)
            .finish_non_exhaustive()
    }
}
