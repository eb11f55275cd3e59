use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use dashmap::DashMap;
use tracing::debug;

use crate::error::Result;
use crate::models::Session;
use crate::store::SessionStore;

/// Idle time after which a session is dropped
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub(crate) fn to_chrono(ttl: Duration) -> chrono::Duration {
    chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(52 * 100))
}

/// Process-local session store
pub struct InMemorySessionStore {
    sessions: DashMap<String, Session>,
    ttl: chrono::Duration,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_TTL)
    }
}

impl InMemorySessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: to_chrono(ttl),
        }
    }
    
    pub fn len(&self) -> usize {
        self.sessions.len()
    }
    
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>> {
        let now = Utc::now();
        let expired = match self.sessions.get(id) {
            Some(entry) if !entry.is_expired(self.ttl, now) => return Ok(Some(entry.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            self.sessions.remove(id);
            debug!(session_id = %id, "Dropped expired session");
        }
        Ok(None)
    }
    
    async fn save(&self, session: &Session) -> Result<()> {
        self.sessions.insert(session.id.clone(), session.clone());
        Ok(())
    }
    
    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.sessions.remove(id).is_some())
    }
    
    async fn purge_expired(&self) -> Result<usize> {
        let now = Utc::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| !s.is_expired(self.ttl, now));
        Ok(before.saturating_sub(self.sessions.len()))
    }
    
    fn name(&self) -> &str {
        "memory"
    }
}
