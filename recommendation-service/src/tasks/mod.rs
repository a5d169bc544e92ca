pub mod analyze_preferences;
pub mod generate_recommendations;
pub mod handle_error;
pub mod read_reviews;
pub mod search_movies;
pub mod utils;

pub use analyze_preferences::AnalyzePreferencesTask;
pub use generate_recommendations::{GENERATION_FAILED_MESSAGE, GenerateRecommendationsTask};
pub use handle_error::{HandleErrorTask, UNEXPECTED_ERROR_MESSAGE};
pub use read_reviews::ReadReviewsTask;
pub use search_movies::SearchMoviesTask;
pub use utils::{StageError, complete_and_extract};
