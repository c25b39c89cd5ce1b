// src/console.rs

use std::io::Write;

/// Destination for the harness's console output: the executed command, the
/// application's output lines, notices and the result line.
///
/// Production uses [`StdoutConsole`]; tests record lines instead.
pub trait Console: Send {
    fn line(&mut self, text: &str);
}

/// Writes each line to stdout and flushes immediately, so output appears as
/// soon as the application emits it.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn line(&mut self, text: &str) {
        let mut out = std::io::stdout().lock();
        // A closed stdout must not take the run down with it.
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }
}
