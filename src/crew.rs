//! Crew: a group of agents and tasks with an execution process.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::agent::Agent;
use crate::errors::ExecutionError;
use crate::process::Process;
use crate::task::{Task, TaskOutput};

/// Aggregate output of a crew run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrewOutput {
    /// Raw text of the final task, returned to callers unchanged.
    pub raw: String,
    /// Outputs of every task, in execution order.
    pub tasks_output: Vec<TaskOutput>,
}

/// A group of agents and the tasks they should perform.
///
/// The façade builds crews of exactly one agent and one task, but the
/// sequential runner handles any number of tasks, threading each output
/// into the next task's context.
#[derive(Debug)]
pub struct Crew {
    /// Unique identifier for the crew instance.
    pub id: Uuid,
    /// Agents available to this crew.
    pub agents: Vec<Agent>,
    /// Tasks to execute, in order.
    pub tasks: Vec<Task>,
    /// The process flow the crew will follow.
    pub process: Process,
}

impl Crew {
    /// Create a crew with an explicit process mode.
    pub fn new(agents: Vec<Agent>, tasks: Vec<Task>, process: Process) -> Self {
        Self {
            id: Uuid::new_v4(),
            agents,
            tasks,
            process,
        }
    }

    /// Run all tasks and return the aggregate output.
    ///
    /// Only [`Process::Sequential`] is runnable; hierarchical crews are
    /// rejected before any task executes.
    pub async fn kickoff(&self) -> Result<CrewOutput, ExecutionError> {
        match self.process {
            Process::Sequential => self.run_sequential().await,
            Process::Hierarchical => Err(ExecutionError::UnsupportedProcess(self.process)),
        }
    }

    fn agent_for(&self, task: &Task) -> Result<&Agent, ExecutionError> {
        match &task.agent {
            Some(role) => self
                .agents
                .iter()
                .find(|a| &a.role == role)
                .ok_or_else(|| ExecutionError::MissingAgent(task.description.clone())),
            None if self.agents.len() == 1 => Ok(&self.agents[0]),
            None => Err(ExecutionError::MissingAgent(task.description.clone())),
        }
    }

    async fn run_sequential(&self) -> Result<CrewOutput, ExecutionError> {
        log::debug!(
            "Crew {} kickoff: {} task(s), process={}",
            self.id,
            self.tasks.len(),
            self.process
        );

        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());
        let mut context: Option<String> = None;

        for task in &self.tasks {
            let agent = self.agent_for(task)?;
            let raw = agent
                .execute_task(&task.description, context.as_deref())
                .await?;
            context = Some(raw.clone());
            outputs.push(TaskOutput {
                description: task.description.clone(),
                raw,
                agent: agent.role.clone(),
                timestamp: chrono::Utc::now(),
            });
        }

        let raw = outputs.last().map(|o| o.raw.clone()).unwrap_or_default();
        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
        })
    }
}
