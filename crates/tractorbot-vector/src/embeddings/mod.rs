//! Text embedding providers

mod hash;
mod openai;

pub use hash::HashEmbedder;
pub use openai::OpenAIEmbedder;

use async_trait::async_trait;

use crate::error::Result;

/// Turns text into fixed-size vectors
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
    
    /// Generate embeddings for multiple texts, in input order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
    
    /// Output dimension
    fn dimension(&self) -> usize;
    
    /// Provider name for logs and health output
    fn name(&self) -> &str;
}
