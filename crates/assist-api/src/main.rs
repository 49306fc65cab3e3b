//! SynKro Assist API Server
//!
//! REST API server for the SynKro Assist chatbot backend.

use assist_api::{create_router, state::AppState};
use assist_core::{AppConfig, ChatLogStore};
use assist_engine::{ChatEngine, GroqClient};
use assist_vector::HttpEmbedding;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Required settings fail before anything else starts
    let config = AppConfig::from_env()?;
    config.validate()?;

    init_tracing(&config);

    let embedder = Arc::new(HttpEmbedding::from_config(&config.embedding)?);
    let llm = Arc::new(GroqClient::from_config(&config.llm)?);

    let store = ChatLogStore::from_config(&config.storage).await?;
    store.init_schema().await?;

    let engine = ChatEngine::new(&config, embedder, llm, Arc::new(store)).await?;
    tracing::info!(
        entries = engine.knowledge_entries(),
        threshold = engine.match_threshold(),
        "Chat engine ready"
    );

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, engine));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("SynKro Assist API listening on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "assist_api={level},assist_engine={level},assist_core={level},tower_http=info",
            level = config.logging.level
        )
        .into()
    });

    if config.logging.json_format {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
