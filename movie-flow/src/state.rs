use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FlowError, Result};
use crate::types::{MovieRecommendation, MovieReview, MovieSearchResult, UserPreferences};

/// Phases shown by the progress indicator, in order
pub const PROGRESS_STEPS: [(AgentStep, &str); 4] = [
    (AgentStep::AnalyzingPreferences, "Understanding your vibe"),
    (AgentStep::SearchingMovies, "Searching thousands of titles"),
    (AgentStep::ReadingReviews, "Reading critic reviews"),
    (AgentStep::GeneratingRecommendations, "Picking your perfect matches"),
];

/// Where a pipeline run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStep {
    Idle,
    AnalyzingPreferences,
    SearchingMovies,
    ReadingReviews,
    GeneratingRecommendations,
    Complete,
    Error,
}

impl AgentStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStep::Idle => "idle",
            AgentStep::AnalyzingPreferences => "analyzing_preferences",
            AgentStep::SearchingMovies => "searching_movies",
            AgentStep::ReadingReviews => "reading_reviews",
            AgentStep::GeneratingRecommendations => "generating_recommendations",
            AgentStep::Complete => "complete",
            AgentStep::Error => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AgentStep::Complete | AgentStep::Error)
    }

    /// Position on the forward path. `Error` sits off the path.
    fn rank(&self) -> Option<u8> {
        match self {
            AgentStep::Idle => Some(0),
            AgentStep::AnalyzingPreferences => Some(1),
            AgentStep::SearchingMovies => Some(2),
            AgentStep::ReadingReviews => Some(3),
            AgentStep::GeneratingRecommendations => Some(4),
            AgentStep::Complete => Some(5),
            AgentStep::Error => None,
        }
    }

    /// Steps only move forward; `error` is reachable from any live step and
    /// terminal steps never change.
    pub fn can_transition_to(&self, next: AgentStep) -> bool {
        if *self == next {
            return true;
        }
        if self.is_terminal() {
            return false;
        }
        match (self.rank(), next.rank()) {
            (_, None) => true,
            (Some(from), Some(to)) => to > from,
            (None, Some(_)) => false,
        }
    }

    pub fn progress_index(&self) -> Option<usize> {
        PROGRESS_STEPS.iter().position(|(step, _)| step == self)
    }

    pub fn progress_label(&self) -> Option<&'static str> {
        PROGRESS_STEPS
            .iter()
            .find(|(step, _)| step == self)
            .map(|(_, label)| *label)
    }
}

impl fmt::Display for AgentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulated state of one pipeline run.
///
/// A state is never mutated in place: [`PipelineState::apply`] consumes it and
/// returns the next snapshot, which is what subscribers observe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineState {
    pub user_preferences: UserPreferences,
    pub search_results: Vec<MovieSearchResult>,
    pub reviews: Vec<MovieReview>,
    pub recommendations: Vec<MovieRecommendation>,
    pub current_step: AgentStep,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PipelineState {
    pub fn new(user_preferences: UserPreferences) -> Self {
        Self {
            user_preferences,
            search_results: Vec::new(),
            reviews: Vec::new(),
            recommendations: Vec::new(),
            current_step: AgentStep::Idle,
            error: None,
        }
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Produce the next state. Fields present in the update replace the
    /// current ones wholesale.
    pub fn apply(mut self, update: StateUpdate) -> Result<Self> {
        if let Some(next) = update.current_step {
            if !self.current_step.can_transition_to(next) {
                return Err(FlowError::InvalidTransition {
                    from: self.current_step,
                    to: next,
                });
            }
            self.current_step = next;
        }
        if let Some(search_results) = update.search_results {
            self.search_results = search_results;
        }
        if let Some(reviews) = update.reviews {
            self.reviews = reviews;
        }
        if let Some(recommendations) = update.recommendations {
            self.recommendations = recommendations;
        }
        if let Some(error) = update.error {
            self.error = Some(error);
        }
        Ok(self)
    }
}

/// Partial state produced by a task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub search_results: Option<Vec<MovieSearchResult>>,
    pub reviews: Option<Vec<MovieReview>>,
    pub recommendations: Option<Vec<MovieRecommendation>>,
    pub current_step: Option<AgentStep>,
    pub error: Option<String>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: AgentStep) -> Self {
        self.current_step = Some(step);
        self
    }

    pub fn search_results(mut self, search_results: Vec<MovieSearchResult>) -> Self {
        self.search_results = Some(search_results);
        self
    }

    pub fn reviews(mut self, reviews: Vec<MovieReview>) -> Self {
        self.reviews = Some(reviews);
        self
    }

    pub fn recommendations(mut self, recommendations: Vec<MovieRecommendation>) -> Self {
        self.recommendations = Some(recommendations);
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
