use serde::Deserialize;

/// Which hosted model provider answers completion calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenRouter,
    Anthropic,
}

/// Single LLM call, or the four-stage pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendMode {
    Pipeline,
    SingleShot,
}

/// What the pipeline does when the search stage yields no candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptySearchPolicy {
    /// Go straight to generation and let the final prompt work from preferences alone
    Continue,
    /// Route to the error stage
    Fail,
}

/// HTTP status used when the pipeline ends in its error state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineErrorStatus {
    /// 200 with `{recommendations: [], error}`
    Ok,
    /// 500 with `{error}`
    ServerError,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_llm_provider")]
    pub llm_provider: LlmProvider,

    /// Model name understood by the selected provider
    #[serde(default)]
    pub llm_model: Option<String>,

    #[serde(default = "default_llm_temperature")]
    pub llm_temperature: f64,

    #[serde(default = "default_llm_max_tokens")]
    pub llm_max_tokens: u64,

    /// Checked when the first completion is requested, not at startup
    #[serde(default)]
    pub openrouter_api_key: Option<String>,

    #[serde(default)]
    pub anthropic_api_key: Option<String>,

    #[serde(default = "default_anthropic_api_url")]
    pub anthropic_api_url: String,

    #[serde(default = "default_recommend_mode")]
    pub recommend_mode: RecommendMode,

    #[serde(default = "default_empty_search_policy")]
    pub empty_search_policy: EmptySearchPolicy,

    #[serde(default = "default_pipeline_error_status")]
    pub pipeline_error_status: PipelineErrorStatus,

    /// OMDb key for poster lookup; without it every poster is a placeholder
    #[serde(default)]
    pub omdb_api_key: Option<String>,

    #[serde(default = "default_omdb_api_url")]
    pub omdb_api_url: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_llm_provider() -> LlmProvider {
    LlmProvider::OpenRouter
}

fn default_llm_temperature() -> f64 {
    0.7
}

fn default_llm_max_tokens() -> u64 {
    8192
}

fn default_anthropic_api_url() -> String {
    "https://api.anthropic.com/v1/messages".to_string()
}

fn default_recommend_mode() -> RecommendMode {
    RecommendMode::Pipeline
}

fn default_empty_search_policy() -> EmptySearchPolicy {
    EmptySearchPolicy::Continue
}

fn default_pipeline_error_status() -> PipelineErrorStatus {
    PipelineErrorStatus::Ok
}

fn default_omdb_api_url() -> String {
    "https://www.omdbapi.com/".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            llm_provider: default_llm_provider(),
            llm_model: None,
            llm_temperature: default_llm_temperature(),
            llm_max_tokens: default_llm_max_tokens(),
            openrouter_api_key: None,
            anthropic_api_key: None,
            anthropic_api_url: default_anthropic_api_url(),
            recommend_mode: default_recommend_mode(),
            empty_search_policy: default_empty_search_policy(),
            pipeline_error_status: default_pipeline_error_status(),
            omdb_api_key: None,
            omdb_api_url: default_omdb_api_url(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Model for the configured provider
    pub fn model(&self) -> &str {
        match (&self.llm_model, self.llm_provider) {
            (Some(model), _) => model.as_str(),
            (None, LlmProvider::OpenRouter) => "anthropic/claude-sonnet-4",
            (None, LlmProvider::Anthropic) => "claude-sonnet-4-20250514",
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
