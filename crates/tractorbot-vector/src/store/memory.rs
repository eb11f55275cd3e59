use async_trait::async_trait;
use tokio::sync::RwLock;

use super::VectorStore;
use crate::error::{Result, VectorError};
use crate::models::{ContextItem, IndexStats, VectorRecord};

/// Process-local store with brute-force cosine similarity
pub struct InMemoryVectorStore {
    dimension: usize,
    records: RwLock<Vec<VectorRecord>>,
}

impl InMemoryVectorStore {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            records: RwLock::new(Vec::new()),
        }
    }
    
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
    
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
    
    fn check_dimension(&self, actual: usize) -> Result<()> {
        if actual != self.dimension {
            return Err(VectorError::DimensionMismatch {
                expected: self.dimension,
                actual,
            });
        }
        Ok(())
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ContextItem>> {
        self.check_dimension(vector.len())?;
        let records = self.records.read().await;
        
        let mut scored: Vec<(f32, &VectorRecord)> = records
            .iter()
            .map(|r| (cosine_similarity(vector, &r.values), r))
            .collect();
        // stable: equal scores keep insertion order
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        
        Ok(scored
            .into_iter()
            .filter_map(|(score, r)| {
                ContextItem::from_match(r.id.clone(), score, Some(r.metadata.clone()))
            })
            .take(top_k)
            .collect())
    }
    
    async fn upsert(&self, new_records: Vec<VectorRecord>) -> Result<usize> {
        for r in &new_records {
            self.check_dimension(r.values.len())?;
        }
        
        let count = new_records.len();
        let mut records = self.records.write().await;
        for record in new_records {
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => records.push(record),
            }
        }
        Ok(count)
    }
    
    async fn delete(&self, ids: &[String]) -> Result<()> {
        self.records.write().await.retain(|r| !ids.contains(&r.id));
        Ok(())
    }
    
    async fn stats(&self) -> Result<IndexStats> {
        Ok(IndexStats {
            dimension: Some(self.dimension),
            total_vector_count: self.records.read().await.len() as u64,
            index_fullness: 0.0,
        })
    }
    
    fn name(&self) -> &str {
        "memory"
    }
}
