use async_trait::async_trait;
use movie_flow::{AgentStep, NextAction, PipelineState, StateUpdate, Task, TaskResult};
use tracing::error;

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Terminal stage for runs routed away from generation
pub struct HandleErrorTask;

#[async_trait]
impl Task for HandleErrorTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn step(&self) -> AgentStep {
        AgentStep::Error
    }

    async fn run(&self, state: &PipelineState) -> movie_flow::Result<TaskResult> {
        let message = state
            .error
            .clone()
            .unwrap_or_else(|| UNEXPECTED_ERROR_MESSAGE.to_string());
        error!(error = %message, "Pipeline ended in error");

        Ok(TaskResult::new(
            StateUpdate::new().recommendations(Vec::new()).error(message),
            NextAction::End,
        ))
    }
}
