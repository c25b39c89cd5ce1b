// src/engine/evaluate.rs

use crate::classify::Classification;
use crate::types::RunResult;

/// Result of evaluating a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub result: RunResult,
    /// Explanation for the operator, printed before the result line.
    pub message: Option<String>,
}

/// Map the application's exit code and the classification state to one
/// terminal result.
///
/// A non-zero exit code always wins over output classification.
pub fn evaluate(exit_code: i32, classification: &Classification) -> Evaluation {
    if exit_code != 0 {
        return Evaluation {
            result: RunResult::NonzeroExit,
            message: Some(format!(
                "Application exited with non-zero exit code {exit_code}."
            )),
        };
    }

    match classification.failures().first() {
        Some(reason) => Evaluation {
            result: RunResult::Failed,
            message: Some(format!("Application output flagged as failing ({reason}).")),
        },
        None => Evaluation {
            result: RunResult::Passed,
            message: None,
        },
    }
}
