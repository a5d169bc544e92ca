pub mod config;
pub mod extract;
pub mod llm;
pub mod poster;
pub mod prompts;
pub mod recommender;
pub mod service;
pub mod tasks;
pub mod workflow;

pub use config::Config;
pub use recommender::{RecommendationOutcome, Recommender, ServiceError};
pub use service::{AppState, build_router, create_app};
pub use workflow::{build_recommendation_workflow, create_flow_runner};
