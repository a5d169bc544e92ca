use async_trait::async_trait;
use movie_flow::{AgentStep, MovieReview, NextAction, PipelineState, StateUpdate, Task, TaskResult};
use std::sync::Arc;
use tracing::{info, warn};

use super::utils::complete_and_extract;
use crate::llm::CompletionClient;
use crate::prompts::review_prompt;

/// Summarizes critical reception of the shortlisted candidates. Failures
/// degrade to no reviews.
pub struct ReadReviewsTask {
    client: Arc<dyn CompletionClient>,
}

impl ReadReviewsTask {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Task for ReadReviewsTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn step(&self) -> AgentStep {
        AgentStep::ReadingReviews
    }

    async fn run(&self, state: &PipelineState) -> movie_flow::Result<TaskResult> {
        if state.search_results.is_empty() {
            info!("No candidates to review");
            return Ok(TaskResult::new(
                StateUpdate::new().reviews(Vec::new()),
                NextAction::Continue,
            ));
        }

        info!(candidates = state.search_results.len(), "Reading reviews");
        let prompt = review_prompt(&state.user_preferences, &state.search_results);
        let reviews = match complete_and_extract::<MovieReview>(self.client.as_ref(), &prompt).await
        {
            Ok(reviews) => reviews,
            Err(e) => {
                let e = e.into_fatal()?;
                warn!(error = %e, "Reading reviews failed, continuing without them");
                Vec::new()
            }
        };

        let status = format!("Collected {} review summaries", reviews.len());
        Ok(TaskResult::new_with_status(
            StateUpdate::new().reviews(reviews),
            NextAction::Continue,
            Some(status),
        ))
    }
}
