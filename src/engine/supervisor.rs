// src/engine/supervisor.rs

//! Async shell around [`SupervisorCore`].
//!
//! The shell owns every resource of a run (process handle, output stream,
//! watchdog, signal bridge) and a single control loop that races:
//! - the next output line,
//! - the stop request (while `Running`),
//! - the application's exit (only once the output is exhausted).
//!
//! Each wake-up becomes one [`SupervisorEvent`]; the core decides what
//! happens and the shell carries out the returned commands in order. The
//! watchdog and signal listeners never touch the process; they only issue the
//! [`StopRequest`].

use std::future::pending;

use tracing::{debug, error, info, warn};

use crate::classify::{NoopClassifier, OutputClassifier, PatternClassifier};
use crate::config::RunConfiguration;
use crate::console::Console;
use crate::engine::core::{LifecycleState, SupervisorCommand, SupervisorCore, SupervisorEvent};
use crate::engine::signals::SignalBridge;
use crate::engine::stop::{StopReason, StopRequest};
use crate::engine::watchdog::Watchdog;
use crate::exec::{ChildProcess, LaunchOptions, MonitorRead, OutputMonitor, launch};
use crate::types::RunResult;

/// Supervises exactly one run of the application under test.
pub struct Supervisor<C> {
    config: RunConfiguration,
    console: C,
    classifier: Box<dyn OutputClassifier>,
    stop: StopRequest,
}

impl<C: Console> Supervisor<C> {
    /// Create a supervisor. The classification hook defaults to the
    /// configured `fail_on_stdout` patterns, or a no-op if there are none.
    pub fn new(config: RunConfiguration, console: C) -> Self {
        let classifier: Box<dyn OutputClassifier> = if config.fail_on_stdout.is_empty() {
            Box::new(NoopClassifier)
        } else {
            Box::new(PatternClassifier::new(config.fail_on_stdout.clone()))
        };

        Self {
            config,
            console,
            classifier,
            stop: StopRequest::new(),
        }
    }

    /// Replace the classification hook.
    pub fn with_classifier(mut self, classifier: impl OutputClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    /// Handle for requesting a graceful stop from outside the run.
    pub fn stop_handle(&self) -> StopRequest {
        self.stop.clone()
    }

    /// Run the application to completion and return the terminal result.
    ///
    /// Never exits the process; `main` maps the result to an exit code.
    pub async fn run(self) -> RunResult {
        let Supervisor {
            config,
            mut console,
            classifier,
            stop,
        } = self;

        let command = config.template.build(&config);
        console.line(&format!("Executing: {}", command.display()));

        let mut core = SupervisorCore::new(config.timeout, classifier);
        let mut handles = RunHandles::default();

        let options = LaunchOptions {
            unbuffered: config.unbuffered,
        };
        let mut child = match launch(command.argv(), options) {
            Ok(child) => child,
            Err(err) => {
                error!(error = %err, "failed to launch application");
                let step = core.step(SupervisorEvent::LaunchFailed {
                    reason: err.to_string(),
                });
                handles.apply(step.commands, &mut console, &stop);
                return step.result.unwrap_or(RunResult::ExecutionError);
            }
        };

        let Some(output) = child.take_output() else {
            error!("application started without an output pipe");
            return RunResult::ExecutionError;
        };
        let mut monitor = OutputMonitor::new(output);
        handles.child = Some(child);

        let step = core.step(SupervisorEvent::Launched);
        handles.apply(step.commands, &mut console, &stop);

        loop {
            let accept_stop = core.state() == LifecycleState::Running;
            let exhausted = monitor.is_exhausted();

            let wake = tokio::select! {
                biased;
                reason = stop.requested(), if accept_stop => Wake::Stop(reason),
                read = monitor.next_line(), if !exhausted => Wake::Read(read),
                code = wait_for_exit(&mut handles.child), if exhausted => Wake::Exit(code),
            };

            let event = match wake {
                Wake::Stop(reason) => SupervisorEvent::StopRequested(reason),
                Wake::Read(Ok(MonitorRead::Line(line))) => SupervisorEvent::Line(line),
                Wake::Read(Ok(MonitorRead::Blank)) => continue,
                Wake::Read(Ok(MonitorRead::Exhausted)) => match handles.try_exit_code() {
                    Ok(Some(code)) => SupervisorEvent::Exited { code },
                    Ok(None) => {
                        debug!("output stream closed before exit; waiting for the application");
                        continue;
                    }
                    Err(e) => SupervisorEvent::Interrupted {
                        reason: format!("checking application status: {e}"),
                    },
                },
                Wake::Read(Err(e)) => SupervisorEvent::Interrupted {
                    reason: format!("reading application output: {e}"),
                },
                Wake::Exit(Ok(code)) => SupervisorEvent::Exited { code },
                Wake::Exit(Err(e)) => SupervisorEvent::Interrupted {
                    reason: format!("waiting for application exit: {e}"),
                },
            };

            let step = core.step(event);
            handles.apply(step.commands, &mut console, &stop);

            if let Some(result) = step.result {
                info!(%result, "run finished");
                return result;
            }
        }
    }
}

enum Wake {
    Stop(StopReason),
    Read(std::io::Result<MonitorRead>),
    Exit(std::io::Result<i32>),
}

async fn wait_for_exit(child: &mut Option<ChildProcess>) -> std::io::Result<i32> {
    match child {
        Some(child) => child.wait().await,
        None => pending().await,
    }
}

/// Resources that live exactly as long as the application does.
#[derive(Default)]
struct RunHandles {
    child: Option<ChildProcess>,
    watchdog: Option<Watchdog>,
    bridge: Option<SignalBridge>,
}

impl RunHandles {
    fn try_exit_code(&mut self) -> std::io::Result<Option<i32>> {
        match self.child.as_mut() {
            Some(child) => child.try_wait(),
            None => Ok(None),
        }
    }

    fn apply<C: Console>(
        &mut self,
        commands: Vec<SupervisorCommand>,
        console: &mut C,
        stop: &StopRequest,
    ) {
        for command in commands {
            match command {
                SupervisorCommand::Print(text) => console.line(&text),
                SupervisorCommand::ArmWatchdog(duration) => {
                    let stop = stop.clone();
                    self.watchdog = Some(Watchdog::arm(duration, move || {
                        stop.issue(StopReason::Timeout(duration));
                    }));
                }
                SupervisorCommand::InstallSignalBridge => {
                    match SignalBridge::install(stop.clone()) {
                        Ok(bridge) => self.bridge = Some(bridge),
                        Err(e) => {
                            warn!(error = %e, "could not install signal handlers; Ctrl-C will not stop the application gracefully");
                        }
                    }
                }
                SupervisorCommand::TerminateChild => {
                    if let Some(child) = &self.child {
                        match child.terminate() {
                            Ok(true) => info!(pid = child.id(), "sent SIGTERM to application"),
                            Ok(false) => debug!("application already exited; nothing to terminate"),
                            Err(e) => warn!(error = %e, "failed to send SIGTERM to application"),
                        }
                    }
                }
                SupervisorCommand::CancelWatchdog => {
                    if let Some(watchdog) = self.watchdog.take() {
                        watchdog.cancel();
                    }
                }
                SupervisorCommand::RetireSignalBridge => {
                    if let Some(bridge) = self.bridge.take() {
                        bridge.retire();
                    }
                }
                SupervisorCommand::ReleaseChild => {
                    self.child = None;
                }
            }
        }
    }
}
