use axum::{
    Router,
    body::{Body, Bytes},
    extract::{Path, Query, State, rejection::QueryRejection},
    http::{HeaderValue, Request, StatusCode, header},
    middleware::{Next, from_fn},
    response::{
        Json, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::stream::Stream;
use movie_flow::{Mood, UserPreferences, WatchingWith};
use serde::Deserialize;
use serde_json::{Value, json};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{Instrument, error, info};
use uuid::Uuid;

use crate::{
    config::{Config, PipelineErrorStatus},
    llm::{CompletionClient, build_completion_client},
    poster::{PosterClient, imdb_url, rotten_tomatoes_url},
    recommender::{RecommendationOutcome, Recommender},
};

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

const MISSING_PREFERENCES: &str = "Missing required preferences";

fn bad_request_error(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

fn internal_error(message: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
    pub posters: PosterClient,
    pub pipeline_error_status: PipelineErrorStatus,
}

impl AppState {
    pub fn new(config: &Config, client: Arc<dyn CompletionClient>) -> Self {
        Self {
            recommender: Recommender::new(config, client),
            posters: PosterClient::new(config.omdb_api_url.clone(), config.omdb_api_key.clone()),
            pipeline_error_status: config.pipeline_error_status,
        }
    }
}

pub fn create_app(config: &Config) -> Router {
    let client = build_completion_client(config);
    build_router(AppState::new(config, client))
}

pub fn build_router(app_state: AppState) -> Router {
    let recommend_route = post(recommend)
        .options(preflight)
        .fallback(method_not_allowed);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/recommend", recommend_route.clone())
        .route("/api/recommend", recommend_route)
        .route("/recommend/stream", get(recommend_stream).options(preflight))
        .route("/poster/{imdb_id}", get(poster).options(preflight))
        .layer(from_fn(cors_headers))
        .layer(from_fn(correlation_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Permissive CORS on every response; JSON unless the handler said otherwise
async fn cors_headers(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers
        .entry(header::CONTENT_TYPE)
        .or_insert(HeaderValue::from_static("application/json"));
    response
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(mut request: Request<Body>, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert("x-correlation-id", value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

async fn root() -> Json<Value> {
    Json(json!({
        "service": "Movie Recommendation Service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /recommend": "Recommend movies for a mood, company and time budget",
            "GET /recommend/stream": "Same, streamed as server-sent progress events",
            "GET /poster/{imdb_id}?title=": "Poster image or placeholder for a movie",
            "GET /health": "Health check"
        }
    }))
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn method_not_allowed() -> ApiError {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "error": "Method not allowed" })),
    )
}

/// Preferences as they arrive on the wire; every field may be missing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendRequest {
    pub mood: Option<Mood>,
    pub watching_with: Option<WatchingWith>,
    pub available_time: Option<u32>,
    pub recently_enjoyed: Option<String>,
}

impl RecommendRequest {
    /// Validate the request. A zero time budget counts as missing.
    pub fn into_preferences(self) -> Result<UserPreferences, ApiError> {
        match (self.mood, self.watching_with, self.available_time) {
            (Some(mood), Some(watching_with), Some(available_time)) if available_time > 0 => {
                Ok(UserPreferences {
                    mood,
                    watching_with,
                    available_time,
                    recently_enjoyed: self.recently_enjoyed.filter(|s| !s.trim().is_empty()),
                })
            }
            _ => Err(bad_request_error(MISSING_PREFERENCES)),
        }
    }
}

fn parse_preferences(body: &[u8]) -> Result<UserPreferences, ApiError> {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        RecommendRequest::default()
    } else {
        serde_json::from_slice::<RecommendRequest>(body)
            .map_err(|_| bad_request_error("Invalid request body"))?
    };
    request.into_preferences()
}

async fn recommend(State(state): State<AppState>, body: Bytes) -> ApiResult<RecommendationOutcome> {
    let preferences = parse_preferences(&body)?;
    info!(
        mood = %preferences.mood,
        watching_with = %preferences.watching_with,
        available_time = preferences.available_time,
        mode = ?state.recommender.mode(),
        "Received recommendation request"
    );

    let outcome = state.recommender.recommend(preferences).await.map_err(|e| {
        error!("Recommendation failed: {}", e);
        internal_error(&e.to_string())
    })?;

    match (&outcome.error, state.pipeline_error_status) {
        (Some(message), PipelineErrorStatus::ServerError) => Err(internal_error(message)),
        _ => Ok(Json(outcome)),
    }
}

fn json_event(name: &str, data: Value) -> Event {
    Event::default().event(name).data(data.to_string())
}

async fn recommend_stream(
    State(state): State<AppState>,
    query: Result<Query<RecommendRequest>, QueryRejection>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let Query(request) = query.map_err(|_| bad_request_error("Invalid query parameters"))?;
    let preferences = request.into_preferences()?;
    info!(mood = %preferences.mood, "Streaming recommendation request");

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let recommender = state.recommender.clone();
    // Runs to completion even if the client goes away
    let run = tokio::spawn(async move { recommender.recommend_with_updates(preferences, tx).await });

    let stream = async_stream::stream! {
        let mut last_step = None;
        while let Some(snapshot) = rx.recv().await {
            let step = snapshot.current_step;
            if last_step == Some(step) {
                continue;
            }
            last_step = Some(step);
            if let (Some(index), Some(label)) = (step.progress_index(), step.progress_label()) {
                yield Ok(json_event("step", json!({ "step": step, "index": index, "label": label })));
            }
        }

        match run.await {
            Ok(Ok(RecommendationOutcome { recommendations, error: None })) => {
                yield Ok(json_event("complete", json!({ "recommendations": recommendations })));
            }
            Ok(Ok(RecommendationOutcome { error: Some(message), .. })) => {
                yield Ok(json_event("error", json!({ "error": message })));
            }
            Ok(Err(e)) => {
                error!("Streamed recommendation failed: {}", e);
                yield Ok(json_event("error", json!({ "error": e.to_string() })));
            }
            Err(e) => {
                error!("Recommendation task panicked: {}", e);
                yield Ok(json_event("error", json!({ "error": "Internal server error" })));
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

#[derive(Debug, Deserialize)]
struct PosterQuery {
    #[serde(default)]
    title: String,
}

async fn poster(
    State(state): State<AppState>,
    Path(imdb_id): Path<String>,
    Query(params): Query<PosterQuery>,
) -> Json<Value> {
    let poster = state.posters.lookup(&imdb_id, &params.title).await;
    Json(json!({
        "imdbId": imdb_id,
        "poster": poster,
        "imdbUrl": imdb_url(&imdb_id),
        "rottenTomatoesUrl": rotten_tomatoes_url(&params.title),
    }))
}
