//! Retrieval plumbing for the support bot.
//!
//! Text is turned into vectors by an [`Embedder`], stored in and queried from
//! a [`VectorStore`], and the two are glued together by [`VectorDb`], which is
//! what the chat service and the admin CLI talk to.

pub mod chunking;
pub mod db;
pub mod embeddings;
pub mod error;
pub mod models;
pub mod store;

pub use chunking::{split_numbered_sections, RecursiveSplitter};
pub use db::{chunk_text, ChunkStrategy, VectorDb};
pub use embeddings::{Embedder, HashEmbedder, OpenAIEmbedder};
pub use error::{Result, VectorError};
pub use models::{ContextItem, IndexStats, Metadata, VectorRecord};
pub use store::{InMemoryVectorStore, PineconeClient, PineconeConfig, VectorStore};
