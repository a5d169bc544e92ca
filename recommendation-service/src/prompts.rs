//! Prompt templates for each stage. Pure string building: the same input always
//! produces the same prompt.

use movie_flow::{MovieReview, MovieSearchResult, UserPreferences};

/// Number of recommendations the pipeline asks for
pub const PIPELINE_RECOMMENDATION_COUNT: usize = 20;

/// Number of recommendations the single-shot path asks for
pub const SINGLE_SHOT_RECOMMENDATION_COUNT: usize = 10;

const SEARCH_RESULT_SHAPE: &str = r#"[
  {
    "title": "Movie Title",
    "year": 2023,
    "imdbId": "tt1234567",
    "runtime": 120,
    "genres": ["Drama", "Comedy"],
    "streamingPlatforms": ["Netflix", "Hulu"],
    "rating": 8.5
  }
]"#;

const REVIEW_SHAPE: &str = r#"[
  {
    "movieTitle": "Movie Title",
    "source": "Aggregated Reviews",
    "summary": "Brief 1-2 sentence summary of critical consensus",
    "sentiment": "positive"
  }
]"#;

const RECOMMENDATION_SHAPE: &str = r#"[
  {
    "title": "Movie Title",
    "year": 2023,
    "runtime": 120,
    "streamingPlatforms": ["Netflix", "Prime Video"],
    "rating": 8.5,
    "genres": ["Drama", "Comedy"],
    "whyItFits": "Personal 1-2 sentence explanation",
    "plot": "Brief 1-2 sentence plot summary without spoilers",
    "imdbId": "tt1234567"
  }
]"#;

const COMPACT_RECOMMENDATION_SHAPE: &str = r#"[{"title":"...","year":2020,"runtime":100,"streamingPlatforms":["Netflix"],"rating":8.0,"genres":["Drama"],"whyItFits":"...","plot":"...","imdbId":"tt1234567"}]"#;

/// Stage 2: ask for a shortlist of candidates
pub fn search_prompt(preferences: &UserPreferences) -> String {
    let recently_enjoyed = preferences
        .recently_enjoyed()
        .map(|liked| format!("Recently enjoyed: {liked}\n"))
        .unwrap_or_default();

    format!(
        "You are a movie recommendation expert. Based on the following preferences, \
suggest 5-7 movies that would be good candidates:

Mood: {mood}
Watching with: {watching_with}
Available time: {minutes} minutes
{recently_enjoyed}
Return a JSON array of movies with this structure:
{SEARCH_RESULT_SHAPE}

Only return valid JSON, no other text.",
        mood = preferences.mood,
        watching_with = preferences.watching_with,
        minutes = preferences.available_time,
    )
}

/// Stage 3: ask for review summaries of the candidates
pub fn review_prompt(preferences: &UserPreferences, candidates: &[MovieSearchResult]) -> String {
    let titles = candidates
        .iter()
        .map(|movie| movie.title.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a movie critic who summarizes critical consensus.
For these movies: {titles}

Provide a brief review summary for each movie that would help someone decide if it fits \
a {mood} mood when watching with {watching_with} and {minutes} minutes available.

Return as JSON array:
{REVIEW_SHAPE}

sentiment must be one of: \"positive\", \"mixed\", \"negative\"
Only return valid JSON, no other text.",
        mood = preferences.mood,
        watching_with = preferences.watching_with,
        minutes = preferences.available_time,
    )
}

/// Stage 4: ask for the final list, with earlier findings as context
pub fn recommendation_prompt(
    preferences: &UserPreferences,
    candidates: &[MovieSearchResult],
    reviews: &[MovieReview],
) -> String {
    let mood = preferences.mood;
    let watching_with = preferences.watching_with;
    let minutes = preferences.available_time;
    let count = PIPELINE_RECOMMENDATION_COUNT;

    let mut prompt = format!(
        "You are a movie recommendation expert. Based on the user's preferences, \
recommend exactly {count} movies.

USER PREFERENCES:
- Mood: {mood}
- Watching with: {watching_with}
- Available time: {minutes} minutes
"
    );
    if let Some(liked) = preferences.recently_enjoyed() {
        prompt.push_str(&format!("- Recently enjoyed: {liked}\n"));
    }

    if !candidates.is_empty() {
        prompt.push_str("\nCANDIDATES ALREADY SHORTLISTED (include the good fits):\n");
        for movie in candidates {
            prompt.push_str(&format!(
                "- {} ({}), {} min, rated {:.1}\n",
                movie.title, movie.year, movie.runtime, movie.rating
            ));
        }
    }

    if !reviews.is_empty() {
        prompt.push_str("\nWHAT CRITICS SAY:\n");
        for review in reviews {
            prompt.push_str(&format!(
                "- {} [{:?}]: {}\n",
                review.movie_title, review.sentiment, review.summary
            ));
        }
    }

    prompt.push_str(&format!(
        "
IMPORTANT REQUIREMENTS:
1. Recommend exactly {count} movies that fit within the {minutes} minute time limit
2. Each movie must have a valid IMDb ID (format: tt followed by 7-8 digits)
3. Include a variety of movies - mix classics and recent films
4. The \"whyItFits\" should be personal, explaining why this movie fits their {mood} mood for {watching_with} viewing
5. The \"plot\" should be a 1-2 sentence non-spoiler summary
6. Include realistic streaming platforms where the movie might be available

Return exactly {count} recommendations as a JSON array:
{RECOMMENDATION_SHAPE}

Only return valid JSON, no other text."
    ));

    prompt
}

/// Single-shot path: one prompt straight to the final list
pub fn single_shot_prompt(preferences: &UserPreferences) -> String {
    let liked = preferences
        .recently_enjoyed()
        .map(|liked| format!("- Liked: {liked}\n"))
        .unwrap_or_default();
    let count = SINGLE_SHOT_RECOMMENDATION_COUNT;

    format!(
        "You are a movie expert. Recommend {count} movies based on:
- Mood: {mood}
- Watching with: {watching_with}
- Max runtime: {minutes} min
{liked}
Return JSON array with {count} movies:
{COMPACT_RECOMMENDATION_SHAPE}

JSON only, no other text.",
        mood = preferences.mood,
        watching_with = preferences.watching_with,
        minutes = preferences.available_time,
    )
}
