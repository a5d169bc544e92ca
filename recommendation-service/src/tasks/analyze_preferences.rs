use async_trait::async_trait;
use movie_flow::{AgentStep, NextAction, PipelineState, StateUpdate, Task, TaskResult};
use tracing::info;

/// Entry stage. Preferences are already structured, so there is nothing to
/// derive yet; the stage exists so progress starts at "understanding your vibe".
pub struct AnalyzePreferencesTask;

#[async_trait]
impl Task for AnalyzePreferencesTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn step(&self) -> AgentStep {
        AgentStep::AnalyzingPreferences
    }

    async fn run(&self, state: &PipelineState) -> movie_flow::Result<TaskResult> {
        let prefs = &state.user_preferences;
        info!(
            mood = %prefs.mood,
            watching_with = %prefs.watching_with,
            available_time = prefs.available_time,
            "Analyzing user preferences"
        );

        Ok(TaskResult::new(StateUpdate::new(), NextAction::Continue))
    }
}
