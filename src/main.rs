mod config;
mod fallback;
mod generator;
mod models;
mod pdf;
mod plans;
mod providers;
mod routes;
mod science;

use anyhow::Context;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{mask_key, Config};
use crate::generator::ContentGenerator;
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    let config = Config::from_env();
    for (provider, settings) in [("OpenAI", &config.openai), ("Gemini", &config.gemini)] {
        match &settings.api_key {
            Some(key) => tracing::info!("🔑 {} key {} (model {})", provider, mask_key(key), settings.model),
            None => tracing::warn!("⚠️ No {} API key configured; its sections will use fallback text", provider),
        }
    }
    tracing::info!("⏱️ Provider timeout {:?}", config.generation.timeout);

    let state = AppState { generator: Arc::new(ContentGenerator::from_config(&config)) };
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    tracing::info!(%addr, "Starting server");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("❌ Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("👋 Shutting down");
}
