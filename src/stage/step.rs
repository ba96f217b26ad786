//! Steps: named, fail-fast units of external-command execution.

use crate::shell::CommandChain;
use std::fmt;
use std::path::PathBuf;

/// Execution state of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Step is waiting to run.
    Pending,

    /// Step is currently executing.
    Running,

    /// Step's whole command chain exited zero.
    Completed,

    /// Step failed; the stage aborts without running later steps.
    Failed,
}

impl StepStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}

/// One fail-fast unit of execution within a stage.
///
/// Steps run strictly in declaration order; the first non-zero exit
/// aborts the stage.
#[derive(Debug, Clone)]
pub struct Step {
    /// Step name, recorded in the stage log.
    pub name: String,

    /// Fully resolved command chain; no substitution happens after this.
    pub chain: CommandChain,

    /// Intermediates consumed by this step, deleted after it succeeds to
    /// bound disk usage. Never touched on the failure path.
    pub cleanup: Vec<PathBuf>,
}

impl Step {
    /// Create a step from a name and a resolved command chain.
    pub fn new(name: impl Into<String>, chain: CommandChain) -> Self {
        Self {
            name: name.into(),
            chain,
            cleanup: Vec::new(),
        }
    }

    /// Mark a file as consumed by this step: it is removed once the step
    /// succeeds.
    #[must_use]
    pub fn cleanup_after(mut self, path: impl Into<PathBuf>) -> Self {
        self.cleanup.push(path.into());
        self
    }
}
