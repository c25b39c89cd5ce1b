// src/exec/launcher.rs

//! Starts the application under test.
//!
//! The child gets a single pipe for both stdout and stderr, so the harness
//! sees one combined stream in the order it was written. It is placed in its
//! own process group: a Ctrl-C in the terminal reaches the harness only, and
//! the harness decides when to forward a stop.

use std::os::fd::OwnedFd;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use nix::errno::Errno;
use nix::sys::signal::{Signal, kill};
use nix::unistd::Pid;
use tokio::net::unix::pipe;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::errors::{HarnessError, Result};

/// Options controlling how the application is started.
#[derive(Debug, Clone, Copy)]
pub struct LaunchOptions {
    /// Wrap the command in `stdbuf -o0` (when available) so the application's
    /// stdout is not block-buffered into the pipe.
    pub unbuffered: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self { unbuffered: true }
    }
}

/// A running application under test.
///
/// Owned by the supervisor for the duration of one run. Dropping it kills
/// the process if it is still alive.
#[derive(Debug)]
pub struct ChildProcess {
    program: PathBuf,
    child: Child,
    output: Option<pipe::Receiver>,
}

impl ChildProcess {
    /// OS process ID, or `None` once the exit status has been collected.
    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Take the read end of the combined stdout/stderr pipe.
    pub fn take_output(&mut self) -> Option<pipe::Receiver> {
        self.output.take()
    }

    /// Ask the application to shut down (SIGTERM).
    ///
    /// Returns `Ok(false)` if the process has already exited.
    pub fn terminate(&self) -> nix::Result<bool> {
        let Some(pid) = self.child.id() else {
            debug!(program = %self.program.display(), "terminate: process already reaped");
            return Ok(false);
        };

        match kill(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            Ok(()) => Ok(true),
            Err(Errno::ESRCH) => {
                debug!(pid, "terminate: no such process (already exited)");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Wait for the process to exit and return its exit code.
    pub async fn wait(&mut self) -> std::io::Result<i32> {
        let status = self.child.wait().await?;
        Ok(exit_code(status))
    }

    /// Non-blocking check for an exit code.
    pub fn try_wait(&mut self) -> std::io::Result<Option<i32>> {
        Ok(self.child.try_wait()?.map(exit_code))
    }
}

/// Exit code of a finished process.
///
/// A process killed by a signal reports the negated signal number, so a
/// SIGTERM'd application shows up as `-15`.
pub fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|sig| -sig))
        .unwrap_or(-1)
}

/// Start `argv[0]` with the remaining elements as its arguments.
///
/// The executable is resolved before any `stdbuf` wrapping so that a missing
/// application is reported as such rather than as a wrapper failure.
pub fn launch(argv: &[String], options: LaunchOptions) -> Result<ChildProcess> {
    let (program, args) = argv.split_first().ok_or_else(|| {
        HarnessError::ConfigError("cannot launch an empty command".to_string())
    })?;

    let resolved = which::which(program).map_err(|e| HarnessError::ExecutableNotFound {
        program: program.clone(),
        reason: e.to_string(),
    })?;

    let (reader, writer) = std::io::pipe()?;
    let writer_err = writer.try_clone()?;

    let child = {
        let mut cmd = wrapped_command(&resolved, options);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_err)
            .process_group(0)
            .kill_on_drop(true);

        // `cmd` holds the parent's copies of the write end; it must be dropped
        // after spawning or the pipe never reports end-of-stream.
        cmd.spawn().map_err(|source| HarnessError::Spawn {
            program: program.clone(),
            source,
        })?
    };

    let output = pipe::Receiver::from_owned_fd(OwnedFd::from(reader))?;

    info!(
        program = %resolved.display(),
        pid = child.id(),
        unbuffered = options.unbuffered,
        "application started"
    );

    Ok(ChildProcess {
        program: resolved,
        child,
        output: Some(output),
    })
}

fn wrapped_command(program: &Path, options: LaunchOptions) -> Command {
    if options.unbuffered {
        match which::which("stdbuf") {
            Ok(stdbuf) => {
                let mut c = Command::new(stdbuf);
                c.arg("-o0").arg(program);
                return c;
            }
            Err(e) => {
                warn!(error = %e, "stdbuf not available; application output may be buffered");
            }
        }
    }
    Command::new(program)
}
