//! Process modes governing how a crew orders its tasks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a crew orders the execution of its tasks.
///
/// The façade always runs with [`Process::Sequential`]. The hierarchical
/// variant is declared so configuration stays explicit, but kickoff rejects
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    /// Tasks run one after another in a fixed order.
    Sequential,
    /// A manager agent delegates tasks to other agents. Not run here.
    Hierarchical,
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Process::Sequential => write!(f, "sequential"),
            Process::Hierarchical => write!(f, "hierarchical"),
        }
    }
}

impl Default for Process {
    fn default() -> Self {
        Process::Sequential
    }
}
