use std::sync::{Arc, Mutex};

use apptest::console::Console;

/// Console that records every line. Clones share the same buffer, so a test
/// can keep one clone and hand the other to the supervisor.
#[derive(Debug, Clone, Default)]
pub struct RecordingConsole {
    lines: Arc<Mutex<Vec<String>>>,
}

impl RecordingConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines.lock().unwrap().iter().any(|l| l == line)
    }

    /// Index of the first line equal to `line`.
    pub fn position(&self, line: &str) -> Option<usize> {
        self.lines.lock().unwrap().iter().position(|l| l == line)
    }

    pub fn last(&self) -> Option<String> {
        self.lines.lock().unwrap().last().cloned()
    }
}

impl Console for RecordingConsole {
    fn line(&mut self, text: &str) {
        self.lines.lock().unwrap().push(text.to_string());
    }
}
