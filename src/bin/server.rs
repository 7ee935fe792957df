//! Document assistant server binary
//!
//! Run with: cargo run --bin askdoc-server

use askdoc::config::AskdocConfig;
use askdoc::generation::OllamaBackend;
use askdoc::server::AskdocServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "askdoc=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::var("ASKDOC_CONFIG") {
        Ok(path) => {
            tracing::info!("loading configuration from {}", path);
            AskdocConfig::load(&path)?
        }
        Err(_) => AskdocConfig::default(),
    };

    tracing::info!("configuration loaded");
    tracing::info!("  - generation model: {}", config.generation.model);
    tracing::info!("  - chunk window: {}", config.chunking.window_size);
    tracing::info!("  - chunk overlap: {}", config.chunking.overlap);
    tracing::info!("  - max upload: {} bytes", config.extraction.max_file_size);

    let backend = OllamaBackend::new(&config.generation)?;
    if backend.health_check().await {
        tracing::info!("Ollama reachable at {}", config.generation.base_url);
    } else {
        tracing::warn!("Ollama not reachable at {}", config.generation.base_url);
        tracing::warn!("answers and summaries will fail until it is started:");
        tracing::warn!("  ollama serve && ollama pull {}", config.generation.model);
    }

    let server = AskdocServer::new(config)?;

    tracing::info!("API: http://{}", server.address());
    tracing::info!("health: http://{}/health", server.address());

    server.start().await?;

    Ok(())
}
