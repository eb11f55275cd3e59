use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::rate_limit::RateLimiter;
use crate::services::ChatService;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub chat: Arc<ChatService>,
    /// `None` when rate limiting is disabled
    pub rate_limiter: Option<Arc<RateLimiter>>,
}

impl AppState {
    pub fn new(config: Config, chat: ChatService) -> Self {
        let rate_limiter = config.rate_limit.enabled.then(|| {
            Arc::new(RateLimiter::new(
                config.rate_limit.requests,
                Duration::from_secs(config.rate_limit.window_secs),
            ))
        });
        
        Self {
            config: Arc::new(config),
            chat: Arc::new(chat),
            rate_limiter,
        }
    }
}
