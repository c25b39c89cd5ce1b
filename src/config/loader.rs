// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{HarnessFile, RawHarnessFile};
use crate::errors::Result;

/// Load a harness file and return the raw `RawHarnessFile`.
///
/// This only performs TOML deserialization; it does **not** validate the
/// command template or patterns. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawHarnessFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawHarnessFile = toml::from_str(&contents)?;

    Ok(raw)
}

/// Read and validate a harness file: missing keys fall back to their serde
/// defaults, the command template is parsed and the `fail_on_stdout`
/// patterns are compiled.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<HarnessFile> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    let harness = HarnessFile::try_from(raw)?;
    debug!(path = %path.display(), ?harness, "loaded harness file");
    Ok(harness)
}
