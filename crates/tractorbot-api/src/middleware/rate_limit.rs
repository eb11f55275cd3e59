use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use std::sync::Arc;

use super::{auth::API_KEY_HEADER, is_public_path};
use crate::{error::ApiError, state::AppState};

/// `X-API-Key` when present, else the peer address
fn client_key(req: &Request) -> String {
    if let Some(key) = req.headers().get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        return format!("key:{}", key);
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| format!("ip:{}", addr.ip()))
        .unwrap_or_else(|| "ip:unknown".to_string())
}

fn set_headers(headers: &mut HeaderMap, limit: u32, remaining: u32, reset: u64) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(reset));
}

pub async fn enforce(
    State(state): State<Arc<AppState>>,
    req: Request,
    next: Next,
) -> Response {
    let Some(limiter) = state.rate_limiter.as_ref() else {
        return next.run(req).await;
    };
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }
    
    let client = client_key(&req);
    let decision = limiter.check(&client);
    
    let mut response = if decision.allowed {
        next.run(req).await
    } else {
        tracing::warn!(
            keyed = client.starts_with("key:"),
            retry_after = decision.reset_secs,
            "Rate limit exceeded"
        );
        ApiError::RateLimited { retry_after: decision.reset_secs }.into_response()
    };
    
    set_headers(response.headers_mut(), decision.limit, decision.remaining, decision.reset_secs);
    response
}
