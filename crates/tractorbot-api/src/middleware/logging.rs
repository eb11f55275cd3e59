use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// One line per request with method, uri, status and latency
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let duration_ms = started.elapsed().as_millis() as u64;
    match status {
        s if s >= 500 => warn!(%method, %uri, status, duration_ms, "Request failed"),
        429 => info!(%method, %uri, status, duration_ms, "Request throttled"),
        _ => info!(%method, %uri, status, duration_ms, "Request completed"),
    }

    response
}
