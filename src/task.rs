//! Task: one unit of work bound to a single agent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of work description, executed by exactly one agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier for the task.
    pub id: Uuid,
    /// The actual work instruction.
    pub description: String,
    /// Role of the agent assigned to this task. `None` falls back to the
    /// crew's only agent when there is exactly one.
    pub agent: Option<String>,
}

impl Task {
    /// Create an unassigned task.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            agent: None,
        }
    }

    /// Create a task assigned to the agent with the given role.
    pub fn with_agent(description: impl Into<String>, agent_role: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            description: description.into(),
            agent: Some(agent_role.into()),
        }
    }
}

/// The result of one executed task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOutput {
    /// Description of the task that produced this output.
    pub description: String,
    /// Raw text produced by the agent, unmodified.
    pub raw: String,
    /// Role of the agent that executed the task.
    pub agent: String,
    /// When the task finished.
    pub timestamp: DateTime<Utc>,
}
