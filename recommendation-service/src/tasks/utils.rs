use movie_flow::FlowError;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::extract::{ExtractError, extract_json_array};
use crate::llm::{CompletionClient, CompletionError};

/// Why a stage produced no result
#[derive(Error, Debug)]
pub enum StageError {
    #[error(transparent)]
    Completion(#[from] CompletionError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl StageError {
    /// A stage may degrade on a failed call, never on a misconfigured client
    pub fn into_fatal(self) -> Result<Self, FlowError> {
        match self {
            StageError::Completion(e) if e.is_configuration() => {
                Err(FlowError::TaskExecutionFailed(e.to_string()))
            }
            other => Ok(other),
        }
    }
}

/// Send `prompt` and parse the first JSON array of `T` out of the answer
pub async fn complete_and_extract<T: DeserializeOwned>(
    client: &dyn CompletionClient,
    prompt: &str,
) -> Result<Vec<T>, StageError> {
    let text = client.complete_text(prompt).await?;
    debug!(response_len = text.len(), "Completion received");
    Ok(extract_json_array(&text)?)
}
