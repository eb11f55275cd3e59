use chrono::Utc;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::chunking::{split_numbered_sections, RecursiveSplitter};
use crate::embeddings::Embedder;
use crate::error::Result;
use crate::models::{ContextItem, IndexStats, Metadata, VectorRecord, TEXT_KEY};
use crate::store::VectorStore;

/// How a document is cut into snippets on ingestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChunkStrategy {
    /// One snippet per `N.` numbered section
    #[default]
    Numbered,
    /// Size-bounded chunks with overlap
    Recursive { chunk_size: usize, overlap: usize },
}

/// Embedder + store pair used for retrieval and ingestion
#[derive(Clone)]
pub struct VectorDb {
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn VectorStore>,
}

impl VectorDb {
    pub fn new(embedder: Arc<dyn Embedder>, store: Arc<dyn VectorStore>) -> Self {
        Self { embedder, store }
    }
    
    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }
    
    pub fn store(&self) -> &dyn VectorStore {
        self.store.as_ref()
    }
    
    /// Top-k snippets relevant to `query`
    pub async fn query_context(&self, query: &str, top_k: usize) -> Result<Vec<ContextItem>> {
        let vector = self.embedder.embed(query).await?;
        let items = self.store.query(&vector, top_k).await?;
        info!(count = items.len(), store = self.store.name(), "Found context items for query");
        Ok(items)
    }
    
    /// Embed and store one snippet; returns the generated vector id
    pub async fn store_context(&self, text: &str, metadata: Option<Metadata>) -> Result<String> {
        let vector = self.embedder.embed(text).await?;
        let record = make_record(text, vector, metadata.unwrap_or_default(), RecordId::Timestamped);
        let id = record.id.clone();
        self.store.upsert(vec![record]).await?;
        info!(id = %id, "Stored context");
        Ok(id)
    }
    
    /// Embed and store many snippets sharing the same base metadata
    ///
    /// Ids are derived from the text alone, so storing the same snippets again
    /// overwrites them instead of adding copies.
    pub async fn store_batch(&self, texts: &[String], metadata: &Metadata) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let vectors = self.embedder.embed_batch(texts).await?;
        let records: Vec<VectorRecord> = texts
            .iter()
            .zip(vectors)
            .map(|(text, vector)| make_record(text, vector, metadata.clone(), RecordId::Content))
            .collect();
        let ids = records.iter().map(|r| r.id.clone()).collect();
        self.store.upsert(records).await?;
        Ok(ids)
    }
    
    pub async fn delete(&self, ids: &[String]) -> Result<()> {
        self.store.delete(ids).await
    }
    
    pub async fn stats(&self) -> Result<IndexStats> {
        self.store.stats().await
    }
    
    pub async fn health_check(&self) -> bool {
        self.store.health_check().await
    }
    
    /// Split a reference document and store every snippet
    pub async fn ingest_file(&self, path: impl AsRef<Path>, strategy: ChunkStrategy) -> Result<Vec<String>> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path).await?;
        
        let modified = tokio::fs::metadata(path)
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map(|t| chrono::DateTime::<Utc>::from(t).to_rfc3339());
        
        let mut metadata = Metadata::new();
        metadata.insert("source".to_string(), Value::from(path.display().to_string()));
        if let Some(modified) = modified {
            metadata.insert("file_modified".to_string(), Value::from(modified));
        }
        
        let chunks = chunk_text(&text, strategy);
        if chunks.is_empty() {
            warn!(path = %path.display(), "No content to ingest");
            return Ok(Vec::new());
        }
        
        let ids = self.store_batch(&chunks, &metadata).await?;
        info!(path = %path.display(), chunks = ids.len(), "Processed context file");
        Ok(ids)
    }
}

pub fn chunk_text(text: &str, strategy: ChunkStrategy) -> Vec<String> {
    match strategy {
        ChunkStrategy::Numbered => split_numbered_sections(text),
        ChunkStrategy::Recursive { chunk_size, overlap } => {
            RecursiveSplitter::new(chunk_size, overlap).split(text)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordId {
    /// `ctx_<sha-prefix>_<unix-millis>`
    Timestamped,
    /// `ctx_<sha-prefix>`; re-ingesting a snippet replaces it
    Content,
}

fn make_record(text: &str, values: Vec<f32>, mut metadata: Metadata, scheme: RecordId) -> VectorRecord {
    let now = Utc::now();
    let digest = hex::encode(Sha256::digest(text.as_bytes()));
    let id = match scheme {
        RecordId::Timestamped => format!("ctx_{}_{}", &digest[..16], now.timestamp_millis()),
        RecordId::Content => format!("ctx_{}", &digest[..32]),
    };
    
    metadata.insert(TEXT_KEY.to_string(), Value::from(text));
    metadata.insert("timestamp".to_string(), Value::from(now.to_rfc3339()));
    
    VectorRecord { id, values, metadata }
}
