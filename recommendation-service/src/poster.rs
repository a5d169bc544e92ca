//! Poster decoration for recommendation cards.
//!
//! Lookups never fail the caller: anything short of a usable image URL becomes
//! a placeholder tile built from the title.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Placeholder tile colours, picked by title length
pub const PLACEHOLDER_PALETTE: [&str; 8] = [
    "violet", "blue", "indigo", "purple", "fuchsia", "cyan", "teal", "emerald",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Poster {
    Image { url: String },
    Placeholder { initials: String, palette: String },
}

impl Poster {
    pub fn placeholder(title: &str) -> Self {
        Poster::Placeholder {
            initials: title_initials(title),
            palette: palette_for(title).to_string(),
        }
    }
}

/// First letter of the first two words, uppercased
pub fn title_initials(title: &str) -> String {
    title
        .split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Indexed by title length in UTF-16 code units, as browsers count it
pub fn palette_for(title: &str) -> &'static str {
    PLACEHOLDER_PALETTE[title.encode_utf16().count() % PLACEHOLDER_PALETTE.len()]
}

pub fn imdb_url(imdb_id: &str) -> String {
    format!("https://www.imdb.com/title/{imdb_id}/")
}

pub fn rotten_tomatoes_url(title: &str) -> String {
    reqwest::Url::parse_with_params("https://www.rottentomatoes.com/search", &[("search", title)])
        .map(String::from)
        .unwrap_or_else(|_| "https://www.rottentomatoes.com/".to_string())
}

#[derive(Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

/// Looks up posters by IMDb id on OMDb
#[derive(Clone)]
pub struct PosterClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl PosterClient {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into(),
            api_key,
        }
    }

    pub async fn lookup(&self, imdb_id: &str, title: &str) -> Poster {
        match self.fetch_url(imdb_id).await {
            Some(url) => Poster::Image { url },
            None => Poster::placeholder(title),
        }
    }

    async fn fetch_url(&self, imdb_id: &str) -> Option<String> {
        if !imdb_id.starts_with("tt") {
            return None;
        }
        let api_key = self.api_key.as_deref()?;

        let response = self
            .http
            .get(&self.api_url)
            .query(&[("i", imdb_id), ("apikey", api_key)])
            .send()
            .await
            .and_then(|r| r.error_for_status());

        let body = match response {
            Ok(response) => response.json::<OmdbResponse>().await,
            Err(e) => Err(e),
        };

        match body {
            Ok(OmdbResponse { poster: Some(url) }) if url != "N/A" && !url.is_empty() => Some(url),
            Ok(_) => None,
            Err(e) => {
                debug!(imdb_id = %imdb_id, error = %e, "Poster lookup failed");
                None
            }
        }
    }
}
