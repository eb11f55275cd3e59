use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form metadata attached to a stored vector
pub type Metadata = Map<String, Value>;

/// Metadata key holding the snippet text
pub const TEXT_KEY: &str = "text";

/// A retrieved reference snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    pub id: String,
    pub text: String,
    pub score: f32,
    #[serde(default)]
    pub metadata: Metadata,
}

impl ContextItem {
    /// Build from a raw match; `None` when the metadata carries no text
    pub fn from_match(id: String, score: f32, metadata: Option<Metadata>) -> Option<Self> {
        let metadata = metadata?;
        let text = metadata.get(TEXT_KEY)?.as_str()?.to_string();
        Some(Self { id, text, score, metadata })
    }
}

/// Upsert unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    #[serde(default)]
    pub dimension: Option<usize>,
    #[serde(default)]
    pub total_vector_count: u64,
    #[serde(default)]
    pub index_fullness: f32,
}
