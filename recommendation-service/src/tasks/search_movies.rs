use async_trait::async_trait;
use movie_flow::{
    AgentStep, MovieSearchResult, NextAction, PipelineState, StateUpdate, Task, TaskResult,
};
use std::sync::Arc;
use tracing::{info, warn};

use super::utils::complete_and_extract;
use crate::llm::CompletionClient;
use crate::prompts::search_prompt;

/// Shortlists candidate movies. Best effort: any failure leaves the
/// shortlist empty and the pipeline carries on.
pub struct SearchMoviesTask {
    client: Arc<dyn CompletionClient>,
}

impl SearchMoviesTask {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Task for SearchMoviesTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn step(&self) -> AgentStep {
        AgentStep::SearchingMovies
    }

    async fn run(&self, state: &PipelineState) -> movie_flow::Result<TaskResult> {
        info!("Searching for movies");

        let prompt = search_prompt(&state.user_preferences);
        let search_results =
            match complete_and_extract::<MovieSearchResult>(self.client.as_ref(), &prompt).await {
                Ok(results) => results,
                Err(e) => {
                    let e = e.into_fatal()?;
                    warn!(error = %e, "Movie search failed, continuing without candidates");
                    Vec::new()
                }
            };

        let status = format!("Found {} candidate movies", search_results.len());
        Ok(TaskResult::new_with_status(
            StateUpdate::new().search_results(search_results),
            NextAction::Continue,
            Some(status),
        ))
    }
}
