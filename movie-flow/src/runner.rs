//! FlowRunner – runs one recommendation pipeline per request.
//!
//! A runner is built once at startup around the shared [`Graph`] and cloned into request
//! handlers. Each call creates a fresh [`PipelineState`] from the caller's preferences, so
//! runs share nothing but the graph itself.
//!
//! Callers that render progress use [`FlowRunner::run_with_updates`] and receive every
//! snapshot on a channel:
//! ```rust,ignore
//! let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
//! let handle = tokio::spawn(async move { runner.run_with_updates(prefs, tx).await });
//! while let Some(state) = rx.recv().await {
//!     println!("{}", state.current_step);
//! }
//! ```
//! Dropping the receiver does not cancel the run; it finishes and its snapshots are discarded.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use crate::{
    error::Result,
    graph::{Graph, publish},
    state::{AgentStep, PipelineState, StateUpdate},
    types::UserPreferences,
};

/// Channel on which state snapshots are published
pub type StateSender = UnboundedSender<PipelineState>;

#[derive(Clone)]
pub struct FlowRunner {
    graph: Arc<Graph>,
}

impl FlowRunner {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    /// Run the pipeline to a terminal state
    pub async fn run(&self, preferences: UserPreferences) -> Result<PipelineState> {
        self.execute(preferences, None).await
    }

    /// Run the pipeline, publishing every intermediate state to `updates`
    pub async fn run_with_updates(
        &self,
        preferences: UserPreferences,
        updates: StateSender,
    ) -> Result<PipelineState> {
        self.execute(preferences, Some(&updates)).await
    }

    async fn execute(
        &self,
        preferences: UserPreferences,
        updates: Option<&StateSender>,
    ) -> Result<PipelineState> {
        let state = PipelineState::new(preferences);
        let state = self.graph.execute(state, updates).await?;

        // A graph that stops without reaching a terminal step failed to produce anything
        let state = if state.current_step.is_terminal() {
            state
        } else {
            let unfinished = state.current_step;
            let state = state.apply(
                StateUpdate::new()
                    .step(AgentStep::Error)
                    .error(format!("Pipeline stopped early at {unfinished}")),
            )?;
            publish(updates, &state);
            state
        };

        info!(
            graph_id = %self.graph.id,
            step = %state.current_step,
            recommendations = state.recommendations.len(),
            "Pipeline finished"
        );
        Ok(state)
    }
}
