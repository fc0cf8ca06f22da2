//! Error types for delegated task execution.

use thiserror::Error;

use crate::process::Process;

/// Errors raised while constructing or running the delegated crew.
///
/// Nothing here is retried or recovered locally; every variant surfaces to
/// the caller with its message and rendered cause chain.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// The model identifier is unusable before any call is made.
    #[error("invalid model identifier: {0:?}")]
    InvalidModel(String),

    /// The local model runtime could not be reached.
    #[error("model runtime unreachable")]
    RuntimeUnreachable(#[source] reqwest::Error),

    /// The model runtime answered, but with an error or an unusable payload.
    #[error("model runtime error: {0}")]
    Runtime(String),

    /// The crew was configured with a process this service does not run.
    #[error("unsupported process: {0}")]
    UnsupportedProcess(Process),

    /// A task had no agent to execute it.
    #[error("no agent available for task: {0}")]
    MissingAgent(String),
}

impl ExecutionError {
    /// Render the full error chain, one cause per line.
    ///
    /// Fills the `traceback` field of the error envelope. Always non-empty
    /// because the top-level message is included.
    pub fn trace(&self) -> String {
        use std::error::Error as _;

        let mut out = format!("ExecutionError: {}", self);
        let mut source = self.source();
        while let Some(cause) = source {
            out.push_str(&format!("\ncaused by: {}", cause));
            source = cause.source();
        }
        out
    }
}
