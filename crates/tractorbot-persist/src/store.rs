use async_trait::async_trait;

use crate::error::Result;
use crate::models::Session;

/// Backend for chat sessions
///
/// Implementations treat a session idle for longer than their TTL as absent.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load a live session
    async fn get(&self, id: &str) -> Result<Option<Session>>;
    
    /// Insert or replace
    async fn save(&self, session: &Session) -> Result<()>;
    
    /// Returns whether a session was removed
    async fn delete(&self, id: &str) -> Result<bool>;
    
    /// Drop idle sessions; returns how many were removed
    async fn purge_expired(&self) -> Result<usize>;
    
    fn name(&self) -> &str;
}
