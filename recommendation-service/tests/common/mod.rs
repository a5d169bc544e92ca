//! Scripted completion client and canned model answers shared by the
//! integration tests. Nothing here touches the network.
#![allow(dead_code)]

use async_trait::async_trait;
use recommendation_service::llm::{CompletionClient, CompletionContent, CompletionError};
use serde_json::{Value, json};
use std::sync::Mutex;

/// Which prompt template a request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Search,
    Reviews,
    Generate,
    SingleShot,
}

pub fn stage_of(prompt: &str) -> Stage {
    if prompt.contains("suggest 5-7 movies") {
        Stage::Search
    } else if prompt.contains("For these movies:") {
        Stage::Reviews
    } else if prompt.contains("Recommend 10 movies") {
        Stage::SingleShot
    } else {
        Stage::Generate
    }
}

/// What the stub answers for one stage
#[derive(Clone)]
pub enum Reply {
    Text(String),
    Blocks(Vec<String>),
    Fail,
    /// Credential disappears after startup
    MissingKey,
}

pub struct ScriptedClient {
    search: Reply,
    reviews: Reply,
    generate: Reply,
    single_shot: Reply,
    calls: Mutex<Vec<Stage>>,
}

impl ScriptedClient {
    /// Every stage answers successfully with `recommendation_count` final picks
    pub fn happy(recommendation_count: usize) -> Self {
        Self {
            search: Reply::Text(search_results_json(3)),
            reviews: Reply::Text(reviews_json()),
            generate: Reply::Text(recommendations_json(recommendation_count, 100)),
            single_shot: Reply::Text(recommendations_json(recommendation_count, 100)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn search(mut self, reply: Reply) -> Self {
        self.search = reply;
        self
    }

    pub fn reviews(mut self, reply: Reply) -> Self {
        self.reviews = reply;
        self
    }

    pub fn generate(mut self, reply: Reply) -> Self {
        self.generate = reply;
        self
    }

    pub fn single_shot(mut self, reply: Reply) -> Self {
        self.single_shot = reply;
        self
    }

    pub fn calls(&self) -> Vec<Stage> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionContent, CompletionError> {
        let stage = stage_of(prompt);
        self.calls.lock().unwrap().push(stage);

        let reply = match stage {
            Stage::Search => &self.search,
            Stage::Reviews => &self.reviews,
            Stage::Generate => &self.generate,
            Stage::SingleShot => &self.single_shot,
        };
        match reply.clone() {
            Reply::Text(text) => Ok(CompletionContent::Text(text)),
            Reply::Blocks(texts) => {
                let blocks: Value = texts
                    .into_iter()
                    .map(|text| json!({ "type": "text", "text": text }))
                    .collect();
                Ok(serde_json::from_value(blocks).unwrap())
            }
            Reply::Fail => Err(CompletionError::Provider("503: overloaded".into())),
            Reply::MissingKey => Err(CompletionError::MissingCredential("OPENROUTER_API_KEY")),
        }
    }
}

pub fn search_results_json(count: usize) -> String {
    let movies: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Candidate {i}"),
                "year": 2000 + i,
                "imdbId": format!("tt{:07}", 1000000 + i),
                "runtime": 95,
                "genres": ["Comedy"],
                "streamingPlatforms": ["Netflix"],
                "rating": 7.5
            })
        })
        .collect();
    format!("Here are some candidates:\n{}", Value::Array(movies))
}

pub fn reviews_json() -> String {
    json!([
        {
            "movieTitle": "Candidate 0",
            "source": "Aggregated Reviews",
            "summary": "Charming and light.",
            "sentiment": "positive"
        }
    ])
    .to_string()
}

pub fn recommendations_json(count: usize, runtime: u32) -> String {
    let movies: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "title": format!("Pick {i}"),
                "year": 2010 + i,
                "runtime": runtime,
                "streamingPlatforms": ["Prime Video"],
                "rating": 8.0,
                "genres": ["Drama"],
                "whyItFits": "It suits a quiet night in.",
                "plot": "Someone learns something.",
                "imdbId": format!("tt{:07}", 2000000 + i)
            })
        })
        .collect();
    format!("```json\n{}\n```", Value::Array(movies))
}
