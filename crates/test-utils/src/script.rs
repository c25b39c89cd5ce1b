use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// A throwaway `/bin/sh` script standing in for the application under test.
///
/// The script is run as `/bin/sh <script> <api_key> <unique_id>` rather than
/// executed directly, which avoids `ETXTBSY` races between writing the file
/// and another test thread forking.
pub struct TestApp {
    dir: TempDir,
    path: PathBuf,
}

impl TestApp {
    pub fn new(body: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join("app.sh");
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write test script");
        Self { dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Command template running this script through `/bin/sh`.
    pub fn template() -> Vec<String> {
        ["/bin/sh", "{path}", "{api_key}", "{unique_id}"]
            .into_iter()
            .map(String::from)
            .collect()
    }
}
