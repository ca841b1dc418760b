mod config;
mod embedding;
mod errors;
mod fewshot;
mod llm_client;
mod messages;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::embedding::OpenAiEmbedder;
use crate::fewshot::ExampleStore;
use crate::llm_client::LlmClient;
use crate::messages::pipeline::LlmTransformer;
use crate::messages::store::MessageStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let target = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{}={}", target, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Dailogy API v{}", env!("CARGO_PKG_VERSION"));

    // Load the precomputed few-shot example table
    let examples = Arc::new(ExampleStore::load(&config.examples_path)?);
    info!(
        "Loaded {} few-shot examples ({}-dim) from {}",
        examples.len(),
        examples.dimension(),
        config.examples_path.display()
    );

    // Initialize LLM and embedding clients
    let llm = Arc::new(LlmClient::new(config.openai_api_key.clone()));
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let embedder = Arc::new(OpenAiEmbedder::new(config.openai_api_key.clone()));
    info!(
        "Embedding client initialized (model: {})",
        embedding::EMBEDDING_MODEL
    );

    let transformer = Arc::new(LlmTransformer::new(
        llm,
        embedder,
        examples.clone(),
        config.num_examples,
    ));

    // Build app state
    let state = AppState {
        config: config.clone(),
        messages: MessageStore::new(),
        examples,
        transformer,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
