use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::is_public_path;
use crate::{error::ApiError, state::AppState};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects requests without the configured `X-API-Key`; a no-op when no key is set
pub async fn require_api_key(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.secrets.api_key.as_deref() else {
        return next.run(req).await;
    };
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }
    
    let provided = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());
    
    if provided == Some(expected) {
        next.run(req).await
    } else {
        tracing::warn!(uri = %req.uri(), "Rejected request with invalid API key");
        ApiError::Unauthorized.into_response()
    }
}
