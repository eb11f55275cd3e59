use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use mongodb::{bson::doc, Client, Collection};
use tracing::info;

use super::models::MongoSession;
use crate::error::{PersistError, Result};
use crate::models::Session;
use crate::store::SessionStore;
use crate::dbs::memory::{to_chrono, DEFAULT_SESSION_TTL};

const COLLECTION: &str = "sessions";

/// Sessions in a MongoDB collection
#[derive(Clone)]
pub struct MongoSessionStore {
    collection: Collection<MongoSession>,
    ttl: chrono::Duration,
}

impl MongoSessionStore {
    /// Connect to MongoDB and ping the server
    pub async fn connect(mongodb_uri: &str, database: &str) -> Result<Self> {
        let client = Client::with_uri_str(mongodb_uri)
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| PersistError::Connection(e.to_string()))?;
        
        info!(database = %database, "Connected to MongoDB");
        Ok(Self {
            collection: db.collection(COLLECTION),
            ttl: to_chrono(DEFAULT_SESSION_TTL),
        })
    }
    
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = to_chrono(ttl);
        self
    }
    
    fn cutoff(&self) -> bson::DateTime {
        bson::DateTime::from_chrono(Utc::now() - self.ttl)
    }
}

#[async_trait]
impl SessionStore for MongoSessionStore {
    async fn get(&self, id: &str) -> Result<Option<Session>> {
        let filter = doc! { "_id": id, "last_activity": { "$gte": self.cutoff() } };
        Ok(self.collection.find_one(filter).await?.map(Session::from))
    }
    
    async fn save(&self, session: &Session) -> Result<()> {
        let document = MongoSession::from(session);
        self.collection
            .replace_one(doc! { "_id": session.id.as_str() }, &document)
            .upsert(true)
            .await?;
        Ok(())
    }
    
    async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
    
    async fn purge_expired(&self) -> Result<usize> {
        let result = self
            .collection
            .delete_many(doc! { "last_activity": { "$lt": self.cutoff() } })
            .await?;
        Ok(result.deleted_count as usize)
    }
    
    fn name(&self) -> &str {
        "mongodb"
    }
}
