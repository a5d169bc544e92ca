use async_trait::async_trait;
use rig::completion::Chat;
use rig::prelude::*;
use rig::providers::openrouter;
use tracing::debug;

use super::{CompletionContent, CompletionError};

/// Completion client backed by a rig OpenRouter agent
pub struct OpenRouterClient {
    api_key: Option<String>,
    model: String,
    temperature: f64,
    max_tokens: u64,
}

impl OpenRouterClient {
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        temperature: f64,
        max_tokens: u64,
    ) -> Self {
        Self {
            api_key,
            model: model.into(),
            temperature,
            max_tokens,
        }
    }

    fn api_key(&self) -> Result<&str, CompletionError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(CompletionError::MissingCredential("OPENROUTER_API_KEY"))
    }

    fn agent(&self) -> Result<rig::agent::Agent<openrouter::CompletionModel>, CompletionError> {
        let api_key = self.api_key()?;
        let client = openrouter::Client::new(api_key);
        Ok(client
            .agent(&self.model)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build())
    }
}

#[async_trait]
impl super::CompletionClient for OpenRouterClient {
    fn ensure_configured(&self) -> Result<(), CompletionError> {
        self.api_key().map(|_| ())
    }

    async fn complete(&self, prompt: &str) -> Result<CompletionContent, CompletionError> {
        let agent = self.agent()?;
        debug!(model = %self.model, prompt_len = prompt.len(), "Sending completion request");

        let answer = agent
            .chat(prompt, vec![])
            .await
            .map_err(|e| CompletionError::Provider(e.to_string()))?;

        Ok(CompletionContent::Text(answer))
    }
}
