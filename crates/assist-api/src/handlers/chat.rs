//! Chat handler

use crate::error::AppError;
use crate::state::AppState;
use assist_core::{ChatResponse, GUEST_USER_ID};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Chat request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// The user's message
    #[schema(example = "How do I reset my password?")]
    pub query: String,

    /// Caller identity; omitted for unauthenticated sessions
    #[serde(default = "default_user_id")]
    #[schema(example = "alice", default = "guest")]
    pub user_id: String,
}

fn default_user_id() -> String {
    GUEST_USER_ID.to_string()
}

/// Chat response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ChatReply {
    /// Answer text
    #[schema(example = "Go to Settings > Security.")]
    pub answer: String,

    /// Which subsystem produced the answer
    #[schema(example = "Knowledge Base")]
    pub source: String,
}

impl From<ChatResponse> for ChatReply {
    fn from(response: ChatResponse) -> Self {
        Self {
            answer: response.answer,
            source: response.source.as_str().to_string(),
        }
    }
}

/// Handle chat requests
#[utoipa::path(
    post,
    path = "/api/v1/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Answer produced", body = ChatReply),
        (status = 400, description = "Invalid request", body = crate::error::ApiError),
        (status = 500, description = "Internal error", body = crate::error::ApiError)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    state.increment_requests();

    let response = state.engine.answer(&req.query, &req.user_id).await?;

    Ok((StatusCode::OK, Json(ChatReply::from(response))))
}
