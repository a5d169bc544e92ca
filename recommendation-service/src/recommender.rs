use movie_flow::{
    AgentStep, FlowError, FlowRunner, MovieRecommendation, StateSender, UserPreferences,
};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

use crate::config::{Config, RecommendMode};
use crate::extract::ExtractError;
use crate::llm::{CompletionClient, CompletionError};
use crate::prompts::single_shot_prompt;
use crate::tasks::{StageError, complete_and_extract};
use crate::workflow::create_flow_runner;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error("Failed to parse recommendations from LLM response")]
    Unparseable,

    #[error("Pipeline failed: {0}")]
    Flow(#[from] FlowError),
}

impl From<StageError> for ServiceError {
    fn from(e: StageError) -> Self {
        match e {
            StageError::Completion(e) => ServiceError::Completion(e),
            StageError::Extract(ExtractError::NotFound) => ServiceError::Unparseable,
        }
    }
}

/// What a request produced. `error` is set when the pipeline ended in its
/// error state; `recommendations` is then empty.
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationOutcome {
    pub recommendations: Vec<MovieRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entry point for producing recommendations in the configured mode
#[derive(Clone)]
pub struct Recommender {
    mode: RecommendMode,
    client: Arc<dyn CompletionClient>,
    runner: FlowRunner,
}

impl Recommender {
    pub fn new(config: &Config, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            mode: config.recommend_mode,
            runner: create_flow_runner(client.clone(), config.empty_search_policy),
            client,
        }
    }

    pub fn mode(&self) -> RecommendMode {
        self.mode
    }

    pub async fn recommend(
        &self,
        preferences: UserPreferences,
    ) -> Result<RecommendationOutcome, ServiceError> {
        self.client.ensure_configured()?;
        match self.mode {
            RecommendMode::SingleShot => Ok(RecommendationOutcome {
                recommendations: self.single_shot(&preferences).await?,
                error: None,
            }),
            RecommendMode::Pipeline => self.pipeline(preferences, None).await,
        }
    }

    /// Run the pipeline and publish each intermediate state to `updates`
    pub async fn recommend_with_updates(
        &self,
        preferences: UserPreferences,
        updates: StateSender,
    ) -> Result<RecommendationOutcome, ServiceError> {
        self.client.ensure_configured()?;
        self.pipeline(preferences, Some(updates)).await
    }

    /// One prompt, one completion, one extraction. Every failure is an error.
    pub async fn single_shot(
        &self,
        preferences: &UserPreferences,
    ) -> Result<Vec<MovieRecommendation>, ServiceError> {
        let prompt = single_shot_prompt(preferences);
        let recommendations = complete_and_extract(self.client.as_ref(), &prompt).await?;
        info!(count = recommendations.len(), "Single-shot recommendations parsed");
        Ok(recommendations)
    }

    async fn pipeline(
        &self,
        preferences: UserPreferences,
        updates: Option<StateSender>,
    ) -> Result<RecommendationOutcome, ServiceError> {
        let state = match updates {
            Some(tx) => self.runner.run_with_updates(preferences, tx).await?,
            None => self.runner.run(preferences).await?,
        };

        let error = match state.current_step {
            AgentStep::Complete => None,
            _ => state.error,
        };
        Ok(RecommendationOutcome {
            recommendations: state.recommendations,
            error,
        })
    }
}
