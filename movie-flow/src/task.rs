use async_trait::async_trait;

use crate::{
    error::Result,
    state::{AgentStep, PipelineState, StateUpdate},
};

/// Result of a task execution
#[derive(Debug, Clone)]
pub struct TaskResult {
    /// Fields this task owns, replacing whatever the state held before
    pub update: StateUpdate,
    /// Next action to take
    pub next_action: NextAction,
    /// Optional human-readable note for logs and progress consumers
    pub status_message: Option<String>,
}

impl TaskResult {
    pub fn new(update: StateUpdate, next_action: NextAction) -> Self {
        Self {
            update,
            next_action,
            status_message: None,
        }
    }

    pub fn new_with_status(
        update: StateUpdate,
        next_action: NextAction,
        status_message: Option<String>,
    ) -> Self {
        Self {
            update,
            next_action,
            status_message,
        }
    }
}

/// Defines what should happen after a task completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextAction {
    /// Follow the outgoing edges of this task
    Continue,
    /// Jump to a specific task by ID
    GoTo(String),
    /// End the run
    End,
}

/// Core trait that all pipeline stages implement
#[async_trait]
pub trait Task: Send + Sync {
    /// Unique identifier for this task
    fn id(&self) -> &str;

    /// Step the pipeline is in while this task runs
    fn step(&self) -> AgentStep;

    /// Execute the task against a snapshot of the state
    async fn run(&self, state: &PipelineState) -> Result<TaskResult>;
}
