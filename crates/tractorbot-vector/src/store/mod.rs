mod memory;
mod pinecone;

pub use memory::InMemoryVectorStore;
pub use pinecone::{PineconeClient, PineconeConfig, PINECONE_CONTROL_PLANE};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ContextItem, IndexStats, VectorRecord};

/// Similarity index holding snippet vectors
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Top-k matches for `vector`, best first. Matches without snippet text are dropped.
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ContextItem>>;
    
    /// Insert or replace records by id; returns how many were written
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize>;
    
    async fn delete(&self, ids: &[String]) -> Result<()>;
    
    async fn stats(&self) -> Result<IndexStats>;
    
    /// Cheap liveness check
    async fn health_check(&self) -> bool {
        self.stats().await.is_ok()
    }
    
    fn name(&self) -> &str;
}
