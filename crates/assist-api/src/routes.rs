//! API route definitions

use crate::handlers::chat;
use crate::state::AppState;
use axum::{routing::post, Router};
use std::sync::Arc;

/// Create API v1 routes
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat::chat_handler))
}
