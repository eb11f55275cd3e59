use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult, ErrorBody},
    services::{chat::validate_message, ChatReply, ChatTurn},
    state::AppState,
};

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    /// Customer message, at most 1000 characters
    #[serde(default)]
    pub message: Option<String>,
    /// Returned by a previous reply; a new session is started when absent
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    /// Context the session is currently in
    pub context: String,
    pub suggested_actions: Vec<String>,
    pub session_id: String,
}

impl From<ChatReply> for ChatResponse {
    fn from(reply: ChatReply) -> Self {
        Self {
            response: reply.response,
            context: reply.context,
            suggested_actions: reply.suggested_actions,
            session_id: reply.session_id,
        }
    }
}

/// Answer a customer message
#[utoipa::path(
    post,
    path = "/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatResponse),
        (status = 400, description = "Missing, empty or too long message", body = ErrorBody),
        (status = 401, description = "Invalid or missing API key", body = ErrorBody),
        (status = 429, description = "Rate limit exceeded"),
        (status = 503, description = "AI service is not available", body = ErrorBody)
    ),
    tag = "chat"
)]
pub async fn chat(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> ApiResult<Json<ChatResponse>> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!("Rejected chat body: {}", rejection.body_text());
        ApiError::BadRequest("Message field required".to_string())
    })?;
    
    let message = validate_message(req.message)?;
    let reply = state
        .chat
        .handle(ChatTurn {
            message,
            session_id: req.session_id,
        })
        .await?;
    
    Ok(Json(reply.into()))
}
