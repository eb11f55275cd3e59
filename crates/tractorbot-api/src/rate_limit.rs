//! Sliding-window request limiter keyed by client

use dashmap::DashMap;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Outcome of one admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    /// Seconds until the oldest counted request leaves the window
    pub reset_secs: u64,
}

/// Admits at most `limit` requests per client within any `window`
pub struct RateLimiter {
    limit: u32,
    window: Duration,
    clients: DashMap<String, VecDeque<Instant>>,
}

fn ceil_secs(d: Duration) -> u64 {
    let secs = d.as_secs();
    if d.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

impl RateLimiter {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self {
            limit,
            window,
            clients: DashMap::new(),
        }
    }
    
    pub fn limit(&self) -> u32 {
        self.limit
    }
    
    pub fn window(&self) -> Duration {
        self.window
    }
    
    pub fn check(&self, client: &str) -> RateDecision {
        self.check_at(client, Instant::now())
    }
    
    pub(crate) fn check_at(&self, client: &str, now: Instant) -> RateDecision {
        let mut hits = self.clients.entry(client.to_string()).or_default();
        while hits
            .front()
            .is_some_and(|t| now.saturating_duration_since(*t) >= self.window)
        {
            hits.pop_front();
        }
        
        let allowed = (hits.len() as u32) < self.limit;
        if allowed {
            hits.push_back(now);
        }
        
        let reset_secs = hits
            .front()
            .map(|oldest| ceil_secs((*oldest + self.window).saturating_duration_since(now)))
            .unwrap_or(0);
        
        RateDecision {
            allowed,
            limit: self.limit,
            remaining: self.limit.saturating_sub(hits.len() as u32),
            reset_secs,
        }
    }
    
    /// Forget clients with no requests inside the window; returns how many
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.clients.len();
        self.clients.retain(|_, hits| {
            hits.back()
                .is_some_and(|t| now.saturating_duration_since(*t) < self.window)
        });
        before.saturating_sub(self.clients.len())
    }
    
    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}
