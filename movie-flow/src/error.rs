use thiserror::Error;

use crate::state::AgentStep;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Graph has no start task")]
    NoStartTask,

    #[error("Invalid step transition from {from} to {to}")]
    InvalidTransition { from: AgentStep, to: AgentStep },

    #[error("Task {0} was already run in this pipeline")]
    TaskRevisited(String),

    #[error("Task execution failed: {0}")]
    TaskExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, FlowError>;
