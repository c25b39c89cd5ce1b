// src/config/mod.rs

//! Configuration for a harness run.
//!
//! Responsibilities:
//! - Define the TOML-backed harness file and the resolved run configuration
//!   (`model.rs`).
//! - Load a harness file from disk (`loader.rs`).
//! - Validate it: template placeholders, patterns, timeout (`validate.rs`).
//! - Combine CLI flags, harness file and environment (`resolve.rs`).

pub mod loader;
pub mod model;
pub mod resolve;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ClassifySection, HarnessFile, HarnessSection, RawHarnessFile, RunConfiguration};
pub use resolve::{
    DEFAULT_TIMEOUT_SECS, MAX_UNIQUE_ID_LEN, NormalizedId, Resolved, default_application_path,
    normalize_unique_id, resolve_run_configuration,
};
pub use validate::timeout_from_secs;
