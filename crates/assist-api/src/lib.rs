//! SynKro Assist API - REST server
//!
//! HTTP surface for the chat pipeline:
//! - `POST /api/v1/chat` answers one query for one user
//! - `GET /` welcome message
//! - `GET /health`, `GET /ready`, `GET /metrics` operational probes
//! - Swagger UI at `/swagger-ui`, OpenAPI document at `/api-docs/openapi.json`

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

#[cfg(feature = "test-utils")]
pub mod test_support;

#[cfg(feature = "test-utils")]
pub use test_support::create_router_for_testing;

use crate::state::AppState;
use assist_core::ServerConfig;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "SynKro Assist API",
        description = "Chatbot backend for the SynKro project platform: curated \
                       knowledge base answers with LLM brainstorming for members"
    ),
    paths(
        handlers::chat::chat_handler,
        handlers::health::health_check,
        handlers::health::readiness_check,
    ),
    components(schemas(
        handlers::chat::ChatRequest,
        handlers::chat::ChatReply,
        error::ApiError,
    )),
    tags(
        (name = "chat", description = "Chat pipeline endpoints"),
        (name = "health", description = "Health and readiness probes")
    )
)]
pub struct ApiDoc;

/// Build the application router with all routes and layers
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(handlers::health::welcome))
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics))
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// CORS layer for the platform frontend.
///
/// Credentials are allowed, so the origin list must stay explicit; a
/// wildcard origin with credentials is rejected by browsers.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}
