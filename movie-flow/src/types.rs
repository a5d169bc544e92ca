use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static IMDB_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tt\d{7,8}$").expect("valid imdb id pattern"));

/// What the viewer is in the mood for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mood {
    Cozy,
    Thrilling,
    Funny,
    Dramatic,
    Romantic,
    ThoughtProvoking,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Cozy => "cozy",
            Mood::Thrilling => "thrilling",
            Mood::Funny => "funny",
            Mood::Dramatic => "dramatic",
            Mood::Romantic => "romantic",
            Mood::ThoughtProvoking => "thought-provoking",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who the viewer is watching with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchingWith {
    Solo,
    Date,
    Family,
    Friends,
}

impl WatchingWith {
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchingWith::Solo => "solo",
            WatchingWith::Date => "date",
            WatchingWith::Family => "family",
            WatchingWith::Friends => "friends",
        }
    }
}

impl fmt::Display for WatchingWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preferences submitted once per request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub mood: Mood,
    pub watching_with: WatchingWith,
    /// Available time in minutes
    pub available_time: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recently_enjoyed: Option<String>,
}

impl UserPreferences {
    pub fn new(mood: Mood, watching_with: WatchingWith, available_time: u32) -> Self {
        Self {
            mood,
            watching_with,
            available_time,
            recently_enjoyed: None,
        }
    }

    pub fn with_recently_enjoyed(mut self, recently_enjoyed: impl Into<String>) -> Self {
        self.recently_enjoyed = Some(recently_enjoyed.into());
        self
    }

    /// The recent favourite, ignoring blank input
    pub fn recently_enjoyed(&self) -> Option<&str> {
        self.recently_enjoyed
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A candidate produced by the search stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSearchResult {
    pub title: String,
    pub year: u32,
    #[serde(default)]
    pub imdb_id: String,
    pub runtime: u32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub streaming_platforms: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Mixed,
    Negative,
}

/// Review summary for a candidate, matched to it by title only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieReview {
    pub movie_title: String,
    pub source: String,
    pub summary: String,
    pub sentiment: Sentiment,
}

/// Final recommendation shown to the user. Only title, year and runtime are
/// required; the rest falls back to empty so one sparse item does not sink the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecommendation {
    pub title: String,
    pub year: u32,
    pub runtime: u32,
    #[serde(default)]
    pub streaming_platforms: Vec<String>,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub why_it_fits: String,
    #[serde(default)]
    pub plot: String,
    #[serde(default)]
    pub imdb_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
}

impl MovieRecommendation {
    pub fn has_imdb_id(&self) -> bool {
        is_imdb_id(&self.imdb_id)
    }
}

/// Checks the `tt` + 7-8 digits shape. Model output is never rejected on this.
pub fn is_imdb_id(id: &str) -> bool {
    IMDB_ID.is_match(id)
}

/// Formats minutes the way the cards show them: `45 min`, `2h`, `1h 30m`
pub fn format_runtime(minutes: u32) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{m} min"),
        (h, 0) => format!("{h}h"),
        (h, m) => format!("{h}h {m}m"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn preferences_use_camel_case_wire_names() {
        let prefs: UserPreferences = serde_json::from_value(json!({
            "mood": "thought-provoking",
            "watchingWith": "date",
            "availableTime": 120,
            "recentlyEnjoyed": "Arrival"
        }))
        .unwrap();

        assert_eq!(prefs.mood, Mood::ThoughtProvoking);
        assert_eq!(prefs.watching_with, WatchingWith::Date);
        assert_eq!(prefs.available_time, 120);
        assert_eq!(prefs.recently_enjoyed(), Some("Arrival"));
    }

    #[test]
    fn blank_recent_favourite_is_absent() {
        let prefs = UserPreferences::new(Mood::Cozy, WatchingWith::Solo, 90)
            .with_recently_enjoyed("   ");
        assert_eq!(prefs.recently_enjoyed(), None);
    }

    #[test]
    fn mood_display_matches_wire_form() {
        assert_eq!(Mood::ThoughtProvoking.to_string(), "thought-provoking");
        assert_eq!(
            serde_json::to_value(Mood::ThoughtProvoking).unwrap(),
            json!("thought-provoking")
        );
        assert_eq!(WatchingWith::Friends.to_string(), "friends");
    }

    #[test]
    fn sparse_search_result_defaults_missing_fields() {
        let result: MovieSearchResult = serde_json::from_value(json!({
            "title": "Heat",
            "year": 1995,
            "runtime": 170
        }))
        .unwrap();

        assert!(result.genres.is_empty());
        assert!(result.streaming_platforms.is_empty());
        assert_eq!(result.imdb_id, "");
        assert_eq!(result.rating, 0.0);
    }

    #[test]
    fn recommendation_without_imdb_id() {
        let rec: MovieRecommendation = serde_json::from_value(json!({
            "title": "Paddington 2",
            "year": 2017,
            "runtime": 103
        }))
        .unwrap();
        assert!(!rec.has_imdb_id());
        assert_eq!(rec.why_it_fits, "");
    }

    #[test]
    fn imdb_ids() {
        assert!(is_imdb_id("tt2278388"));
        assert!(is_imdb_id("tt12345678"));
        assert!(!is_imdb_id("tt123456"));
        assert!(!is_imdb_id("nm2278388"));
        assert!(!is_imdb_id("tt123456789"));
    }

    #[test]
    fn runtime_formatting() {
        assert_eq!(format_runtime(45), "45 min");
        assert_eq!(format_runtime(120), "2h");
        assert_eq!(format_runtime(90), "1h 30m");
    }
}
