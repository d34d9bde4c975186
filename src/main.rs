use tracing_subscriber::EnvFilter;

use professor_chat::api;
use professor_chat::config::Config;
use professor_chat::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();
    tracing::info!(
        "Embedding model: {} ({})",
        config.embedding.model,
        config.embedding.base_url
    );
    tracing::info!(
        "Chat model: {} ({})",
        config.completion.model,
        config.completion.base_url
    );
    for name in config.missing_credentials() {
        tracing::warn!("{name} is not set; requests to that service will fail");
    }

    let state = AppState::new(&config).await?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
