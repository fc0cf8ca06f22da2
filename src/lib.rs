//! # crew-wrapper
//!
//! A thin HTTP façade that turns one task request into one delegated crew
//! execution against a locally hosted Ollama model.
//!
//! The service exposes a single `POST /execute` endpoint. Each request
//! builds one [`Agent`] from the supplied persona, wraps the task
//! description in one [`Task`], runs both inside a sequential single-agent
//! [`Crew`], and returns the textual result unchanged. Every request is
//! independent; nothing is persisted.

pub mod agent;
pub mod crew;
pub mod errors;
pub mod execution;
pub mod llm;
pub mod process;
pub mod server;
pub mod task;

pub use agent::Agent;
pub use crew::{Crew, CrewOutput};
pub use errors::ExecutionError;
pub use execution::{CrewRunner, TaskRequest, TaskRunner};
pub use llm::{CompletionBackend, OllamaCompletion};
pub use process::Process;
pub use task::{Task, TaskOutput};

/// Service version reported by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
