//! Agent: a configured persona bound to one inference model.

use std::sync::Arc;

use uuid::Uuid;

use crate::errors::ExecutionError;
use crate::llm::CompletionBackend;

/// A persona (role, goal, backstory) bound to a specific completion backend.
///
/// Executing a task composes a role-playing prompt from the persona and the
/// task description, then makes exactly one completion call. There is no
/// planning loop, tool use, or delegation.
pub struct Agent {
    /// Unique identifier for the agent.
    pub id: Uuid,
    /// Role of the agent.
    pub role: String,
    /// Objective of the agent.
    pub goal: String,
    /// Additional persona context; may be empty.
    pub backstory: String,
    /// Verbose mode for agent execution.
    pub verbose: bool,
    llm: Arc<dyn CompletionBackend>,
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("id", &self.id)
            .field("role", &self.role)
            .field("goal", &self.goal)
            .field("model", &self.llm.model())
            .finish_non_exhaustive()
    }
}

impl Agent {
    /// Create an agent with the given persona and model backend.
    pub fn new(
        role: impl Into<String>,
        goal: impl Into<String>,
        backstory: impl Into<String>,
        llm: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role: role.into(),
            goal: goal.into(),
            backstory: backstory.into(),
            verbose: false,
            llm,
        }
    }

    /// Model identifier of the bound backend.
    pub fn model(&self) -> &str {
        self.llm.model()
    }

    /// Compose the role-playing prompt for one task.
    fn task_prompt(&self, task_description: &str, context: Option<&str>) -> String {
        let mut prompt = format!("You are {}.", self.role);
        if !self.backstory.is_empty() {
            prompt.push(' ');
            prompt.push_str(&self.backstory);
        }
        prompt.push_str(&format!("\nYour personal goal is: {}", self.goal));
        prompt.push_str(&format!("\n\nCurrent Task: {}", task_description));
        if let Some(ctx) = context {
            prompt.push_str(&format!(
                "\n\nThis is the context you're working with:\n{}",
                ctx
            ));
        }
        prompt.push_str("\n\nBegin! Give your best final answer.");
        prompt
    }

    /// Execute one task description against the bound model.
    ///
    /// `context` carries the previous task's output when the crew runs more
    /// than one task.
    pub async fn execute_task(
        &self,
        task_description: &str,
        context: Option<&str>,
    ) -> Result<String, ExecutionError> {
        log::debug!("Agent '{}' executing task: {}", self.role, task_description);

        let prompt = self.task_prompt(task_description, context);
        let result = self.llm.complete(&prompt).await?;

        if self.verbose {
            log::info!("Agent '{}' produced {} chars", self.role, result.len());
        }
        Ok(result)
    }
}
