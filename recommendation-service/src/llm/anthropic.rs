use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CompletionClient, CompletionContent, CompletionError};

const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u64,
    temperature: f64,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: CompletionContent,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Completion client calling the Anthropic Messages API directly
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: Option<String>,
    api_url: String,
    model: String,
    temperature: f64,
    max_tokens: u64,
}

impl AnthropicClient {
    pub fn new(
        api_key: Option<String>,
        api_url: impl Into<String>,
        model: impl Into<String>,
        temperature: f64,
        max_tokens: u64,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            api_url: api_url.into(),
            model: model.into(),
            temperature,
            max_tokens,
        }
    }

    fn api_key(&self) -> Result<&str, CompletionError> {
        self.api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(CompletionError::MissingCredential("ANTHROPIC_API_KEY"))
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    fn ensure_configured(&self) -> Result<(), CompletionError> {
        self.api_key().map(|_| ())
    }

    async fn complete(&self, prompt: &str) -> Result<CompletionContent, CompletionError> {
        let api_key = self.api_key()?;

        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: [Message {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending completion request");
        let response = self
            .http
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Provider(format!("{status}: {message}")));
        }

        let body: MessagesResponse = response.json().await?;
        Ok(body.content)
    }
}
