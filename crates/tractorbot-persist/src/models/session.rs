use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tractorbot_context::{ContextInfo, HistoryEntry};
use uuid::Uuid;

/// Messages kept per session; older ones are dropped first
pub const MAX_HISTORY: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMessage {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&SessionMessage> for HistoryEntry {
    fn from(msg: &SessionMessage) -> Self {
        match msg.role {
            MessageRole::User => HistoryEntry::User(msg.content.clone()),
            MessageRole::Assistant => HistoryEntry::Assistant(msg.content.clone()),
        }
    }
}

/// Per-conversation state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    /// Last non-General context seen, or General if nothing else yet
    pub context: Option<ContextInfo>,
    /// Reply language set with `translate <lang>`
    pub language: Option<String>,
    #[serde(default)]
    pub history: Vec<SessionMessage>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            context: None,
            language: None,
            history: Vec::new(),
            created_at: now,
            last_activity: now,
        }
    }
    
    /// Session with a fresh v4 UUID
    pub fn generate() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
    
    /// Record the classified context. A `General` result only fills an
    /// empty slot so a topic survives small talk.
    pub fn apply_context(&mut self, context: &ContextInfo) {
        if self.context.is_none() || !context.is_general() {
            self.context = Some(context.clone());
        }
    }
    
    pub fn push_message(&mut self, role: MessageRole, content: impl Into<String>) {
        let now = Utc::now();
        self.history.push(SessionMessage {
            role,
            content: content.into(),
            timestamp: now,
        });
        if self.history.len() > MAX_HISTORY {
            let excess = self.history.len() - MAX_HISTORY;
            self.history.drain(..excess);
        }
        self.last_activity = now;
    }
    
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
    
    /// Forget the conversation; the chosen language is kept
    pub fn reset(&mut self) {
        self.context = None;
        self.history.clear();
        self.touch();
    }
    
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.last_activity > ttl
    }
    
    /// The newest `limit` messages as prompt history, oldest first
    pub fn recent_history(&self, limit: usize) -> Vec<HistoryEntry> {
        let start = self.history.len().saturating_sub(limit);
        self.history[start..].iter().map(HistoryEntry::from).collect()
    }
}
