use recommendation_service::{Config, create_app};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured tracing based on environment variables
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "recommendation_service=debug,movie_flow=debug,tower_http=debug".into()
    });

    match log_format.as_str() {
        "pretty" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing();

    info!(
        provider = ?config.llm_provider,
        model = %config.model(),
        mode = ?config.recommend_mode,
        empty_search_policy = ?config.empty_search_policy,
        "Starting recommendation service"
    );

    let app = create_app(&config);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Server running on http://{}", address);

    info!("Available endpoints:");
    info!("  GET  /health                   - Health check");
    info!("  POST /recommend                - Recommend movies");
    info!("  GET  /recommend/stream         - Recommend movies with progress events");
    info!("  GET  /poster/{{imdb_id}}?title= - Poster or placeholder");

    axum::serve(listener, app).await?;

    Ok(())
}
