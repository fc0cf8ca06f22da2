//! Execution façade: one validated request in, one delegated crew run out.
//!
//! The request handler only depends on the [`TaskRunner`] trait, so tests
//! can substitute a recording runner and the orchestration layer can evolve
//! behind the seam.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::crew::Crew;
use crate::errors::ExecutionError;
use crate::llm::OllamaCompletion;
use crate::process::Process;
use crate::task::Task;

/// One incoming task request.
///
/// All fields except `backstory` are required; `backstory` defaults to the
/// empty string when omitted. Constructed per request, discarded after the
/// call returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
    /// Which locally hosted inference model to use.
    pub model_name: String,
    /// Persona label for the agent.
    pub role: String,
    /// Persona objective.
    pub goal: String,
    /// The actual work instruction.
    pub task: String,
    /// Additional persona context.
    #[serde(default)]
    pub backstory: String,
}

/// Capability the request handler delegates to: given a validated request,
/// produce one text result or fail.
#[async_trait]
pub trait TaskRunner: Send + Sync {
    /// Run the request to completion and return the raw result text.
    async fn run(&self, request: &TaskRequest) -> Result<String, ExecutionError>;
}

/// [`TaskRunner`] adapter over a single-agent sequential crew backed by the
/// local Ollama runtime.
///
/// Holds the one reqwest client shared by every request; each run only
/// builds its own agent/task/crew graph around it.
#[derive(Debug, Clone)]
pub struct CrewRunner {
    client: reqwest::Client,
}

impl CrewRunner {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for CrewRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRunner for CrewRunner {
    /// Build one agent, one task, one sequential crew, and kick it off.
    ///
    /// Any failure along the way propagates unmodified to the caller; the
    /// result string of the final (only) task is returned unchanged.
    async fn run(&self, request: &TaskRequest) -> Result<String, ExecutionError> {
        let llm = OllamaCompletion::with_client(
            request.model_name.clone(),
            OllamaCompletion::base_url_from_env(),
            self.client.clone(),
        )?;
        let agent = Agent::new(
            request.role.clone(),
            request.goal.clone(),
            request.backstory.clone(),
            Arc::new(llm),
        );
        let task = Task::with_agent(request.task.clone(), request.role.clone());

        let crew = Crew::new(vec![agent], vec![task], Process::Sequential);
        let output = crew.kickoff().await?;
        Ok(output.raw)
    }
}
