pub mod error;
pub mod graph;
pub mod runner;
pub mod state;
pub mod task;
pub mod types;

// Re-export commonly used types
pub use error::{FlowError, Result};
pub use graph::{Graph, GraphBuilder};
pub use runner::{FlowRunner, StateSender};
pub use state::{AgentStep, PROGRESS_STEPS, PipelineState, StateUpdate};
pub use task::{NextAction, Task, TaskResult};
pub use types::{
    Mood, MovieRecommendation, MovieReview, MovieSearchResult, Sentiment, UserPreferences,
    WatchingWith, format_runtime, is_imdb_id,
};
