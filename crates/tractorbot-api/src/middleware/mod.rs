pub mod auth;
pub mod logging;
pub mod rate_limit;
pub mod timeout;

/// Paths served without API key or rate limiting
pub fn is_public_path(path: &str) -> bool {
    path == "/health" || path.starts_with("/api-docs")
}
