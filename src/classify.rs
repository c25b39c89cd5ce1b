// src/classify.rs

//! Output classification hook.
//!
//! The supervisor hands every non-empty output line to an
//! [`OutputClassifier`]. A classifier returns `Some(reason)` to flag the run
//! as failed even if the application later exits with code 0.
//!
//! Closures `FnMut(&str) -> Option<String>` are classifiers too:
//!
//! ```ignore
//! let classifier = |line: &str| line.contains("panic").then(|| line.to_string());
//! ```

use regex::Regex;
use tracing::debug;

pub trait OutputClassifier: Send {
    /// Inspect one output line; return a reason to record a failure.
    fn classify(&mut self, line: &str) -> Option<String>;
}

impl<F> OutputClassifier for F
where
    F: FnMut(&str) -> Option<String> + Send,
{
    fn classify(&mut self, line: &str) -> Option<String> {
        self(line)
    }
}

/// Default hook: never flags anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopClassifier;

impl OutputClassifier for NoopClassifier {
    fn classify(&mut self, _line: &str) -> Option<String> {
        None
    }
}

/// Flags any line matching one of the configured `fail_on_stdout` patterns.
#[derive(Debug, Clone)]
pub struct PatternClassifier {
    patterns: Vec<Regex>,
}

impl PatternClassifier {
    pub fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }
}

impl OutputClassifier for PatternClassifier {
    fn classify(&mut self, line: &str) -> Option<String> {
        let re = self.patterns.iter().find(|re| re.is_match(line))?;
        debug!(pattern = %re.as_str(), "output line matched fail_on_stdout");
        Some(format!("line matched '{}': {}", re.as_str(), line))
    }
}

/// Failure reasons accumulated while the output was scanned.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Classification {
    failures: Vec<String>,
}

impl Classification {
    pub fn record_failure(&mut self, reason: String) {
        self.failures.push(reason);
    }

    pub fn has_failure(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }
}
