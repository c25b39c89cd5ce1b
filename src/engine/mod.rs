// src/engine/mod.rs

//! Supervision engine.
//!
//! This module ties together:
//! - the lifecycle state machine (`Idle → Running → Draining → Terminated`)
//! - the watchdog enforcing the maximum run duration
//! - the signal bridge turning SIGINT/SIGTERM into a graceful stop
//! - the evaluator mapping the exit code to a [`RunResult`](crate::types::RunResult)
//!
//! The pure state machine lives in [`core`]; the async/IO shell is
//! implemented in [`supervisor`].

pub mod core;
pub mod evaluate;
pub mod signals;
pub mod stop;
pub mod supervisor;
pub mod watchdog;

pub use self::core::{CoreStep, LifecycleState, SupervisorCommand, SupervisorCore, SupervisorEvent};
pub use evaluate::{Evaluation, evaluate};
pub use signals::{BridgedSignal, SignalBridge};
pub use stop::{StopReason, StopRequest};
pub use supervisor::Supervisor;
pub use watchdog::Watchdog;
