use std::sync::Arc;

use chess_core::GameMode;
use server::clients::GeminiClient;
use server::config::Config;
use server::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    let gemini = GeminiClient::new(&config)?;
    tracing::info!(model = %config.gemini_model, "Gemini move generator ready");

    let state = AppState::new(GameMode::HumanVsAi, Arc::new(gemini), config.ai_settings());
    let app = server::app(state);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
