use async_trait::async_trait;
use movie_flow::{
    AgentStep, MovieRecommendation, NextAction, PipelineState, StateUpdate, Task, TaskResult,
};
use std::sync::Arc;
use tracing::{error, info};

use super::utils::complete_and_extract;
use crate::llm::CompletionClient;
use crate::prompts::recommendation_prompt;

/// Message shown to the user whenever the final stage fails, whatever the cause
pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate recommendations. Please try again.";

/// Produces the final list. The only stage whose failure is fatal.
pub struct GenerateRecommendationsTask {
    client: Arc<dyn CompletionClient>,
}

impl GenerateRecommendationsTask {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Task for GenerateRecommendationsTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn step(&self) -> AgentStep {
        AgentStep::GeneratingRecommendations
    }

    async fn run(&self, state: &PipelineState) -> movie_flow::Result<TaskResult> {
        info!(
            candidates = state.search_results.len(),
            reviews = state.reviews.len(),
            "Generating personalized recommendations"
        );

        let prompt = recommendation_prompt(
            &state.user_preferences,
            &state.search_results,
            &state.reviews,
        );

        let update =
            match complete_and_extract::<MovieRecommendation>(self.client.as_ref(), &prompt).await
            {
                Ok(recommendations) => {
                    let without_imdb_id =
                        recommendations.iter().filter(|r| !r.has_imdb_id()).count();
                    info!(
                        count = recommendations.len(),
                        without_imdb_id, "Parsed recommendations"
                    );
                    StateUpdate::new()
                        .recommendations(recommendations)
                        .step(AgentStep::Complete)
                }
                Err(e) => {
                    let e = e.into_fatal()?;
                    error!(error = %e, "Generating recommendations failed");
                    StateUpdate::new()
                        .recommendations(Vec::new())
                        .step(AgentStep::Error)
                        .error(GENERATION_FAILED_MESSAGE)
                }
            };

        Ok(TaskResult::new(update, NextAction::End))
    }
}
