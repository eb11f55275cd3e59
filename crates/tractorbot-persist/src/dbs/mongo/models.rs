use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tractorbot_context::ContextInfo;

use crate::models::{Session, SessionMessage};

/// Stored session document; timestamps are BSON dates so expiry can be queried
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MongoSession {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ContextInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub history: Vec<SessionMessage>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub last_activity: DateTime<Utc>,
}

impl From<&Session> for MongoSession {
    fn from(s: &Session) -> Self {
        Self {
            id: s.id.clone(),
            context: s.context.clone(),
            language: s.language.clone(),
            history: s.history.clone(),
            created_at: s.created_at,
            last_activity: s.last_activity,
        }
    }
}

impl From<MongoSession> for Session {
    fn from(s: MongoSession) -> Self {
        Self {
            id: s.id,
            context: s.context,
            language: s.language,
            history: s.history,
            created_at: s.created_at,
            last_activity: s.last_activity,
        }
    }
}
