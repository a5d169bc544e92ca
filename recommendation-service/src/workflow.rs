use movie_flow::{FlowRunner, Graph, GraphBuilder, PipelineState, Task};
use std::sync::Arc;

use crate::config::EmptySearchPolicy;
use crate::llm::CompletionClient;
use crate::tasks::{
    AnalyzePreferencesTask, GenerateRecommendationsTask, HandleErrorTask, ReadReviewsTask,
    SearchMoviesTask,
};

pub const WORKFLOW_ID: &str = "movie_recommendation_flow";

/// analyze → search → reviews → generate, with a shared error exit
pub fn build_recommendation_workflow(
    client: Arc<dyn CompletionClient>,
    empty_search_policy: EmptySearchPolicy,
) -> Graph {
    let analyze_task: Arc<dyn Task> = Arc::new(AnalyzePreferencesTask);
    let search_task: Arc<dyn Task> = Arc::new(SearchMoviesTask::new(client.clone()));
    let reviews_task: Arc<dyn Task> = Arc::new(ReadReviewsTask::new(client.clone()));
    let generate_task: Arc<dyn Task> = Arc::new(GenerateRecommendationsTask::new(client));
    let error_task: Arc<dyn Task> = Arc::new(HandleErrorTask);

    let analyze_id = analyze_task.id().to_string();
    let search_id = search_task.id().to_string();
    let reviews_id = reviews_task.id().to_string();
    let generate_id = generate_task.id().to_string();
    let error_id = error_task.id().to_string();

    let no_candidates_is_fatal = empty_search_policy == EmptySearchPolicy::Fail;

    GraphBuilder::new(WORKFLOW_ID)
        .add_task(analyze_task)
        .add_task(search_task)
        .add_task(reviews_task)
        .add_task(generate_task)
        .add_task(error_task)
        .add_conditional_edge(&analyze_id, &error_id, PipelineState::has_error)
        .add_edge(&analyze_id, &search_id)
        .add_conditional_edge(&search_id, &error_id, PipelineState::has_error)
        .add_conditional_edge(&search_id, &error_id, move |state: &PipelineState| {
            no_candidates_is_fatal && state.search_results.is_empty()
        })
        .add_conditional_edge(&search_id, &generate_id, |state: &PipelineState| {
            state.search_results.is_empty()
        })
        .add_edge(&search_id, &reviews_id)
        .add_conditional_edge(&reviews_id, &error_id, PipelineState::has_error)
        .add_edge(&reviews_id, &generate_id)
        .set_start_task(&analyze_id)
        .build()
}

pub fn create_flow_runner(
    client: Arc<dyn CompletionClient>,
    empty_search_policy: EmptySearchPolicy,
) -> FlowRunner {
    FlowRunner::new(Arc::new(build_recommendation_workflow(
        client,
        empty_search_policy,
    )))
}
