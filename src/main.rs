mod config;
mod error;
mod gemini;
mod markdown;
mod server;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Gemini chat starting...");

    // Load configuration
    let config = config::load_config()?;
    tracing::info!(model = %config.gemini_model, "Model configured");
    tracing::info!(static_dir = %config.static_dir.display(), "Static dir configured");

    if !config.static_dir.is_dir() {
        tracing::warn!(
            static_dir = %config.static_dir.display(),
            "Static dir does not exist; only /api/chat will be served"
        );
    }

    let state = server::AppState::new(config)?;

    server::build_and_run(state).await?;

    Ok(())
}
