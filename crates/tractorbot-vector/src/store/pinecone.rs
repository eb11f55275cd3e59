use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::VectorStore;
use crate::error::{Result, VectorError};
use crate::models::{ContextItem, IndexStats, Metadata, VectorRecord};

pub const PINECONE_CONTROL_PLANE: &str = "https://api.pinecone.io";
const API_VERSION: &str = "2024-07";

/// Connection settings for a Pinecone serverless index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    /// Data-plane host; resolved from the control plane when absent
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub namespace: String,
    #[serde(default = "default_control_plane")]
    pub control_plane_url: String,
}

fn default_control_plane() -> String {
    PINECONE_CONTROL_PLANE.to_string()
}

impl PineconeConfig {
    pub fn new(api_key: impl Into<String>, index_name: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            index_name: index_name.into(),
            host: None,
            namespace: String::new(),
            control_plane_url: default_control_plane(),
        }
    }
    
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
    
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
    
    pub fn with_control_plane(mut self, url: impl Into<String>) -> Self {
        self.control_plane_url = url.into();
        self
    }
}

/// Pinecone REST client (data plane + index lookup)
pub struct PineconeClient {
    client: Client,
    config: PineconeConfig,
    host: OnceCell<String>,
}

#[derive(Deserialize)]
struct IndexDescription {
    host: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<QueryMatch>,
}

#[derive(Deserialize)]
struct QueryMatch {
    id: String,
    #[serde(default)]
    score: f32,
    #[serde(default)]
    metadata: Option<Metadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertResponse {
    #[serde(default)]
    upserted_count: usize,
}

fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}

impl PineconeClient {
    pub fn new(config: PineconeConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(VectorError::Config("Pinecone API key not provided".to_string()));
        }
        if config.index_name.trim().is_empty() && config.host.is_none() {
            return Err(VectorError::Config("Pinecone index name or host required".to_string()));
        }
        
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        
        let host = OnceCell::new();
        if let Some(h) = config.host.as_deref().filter(|h| !h.trim().is_empty()) {
            // set() only fails when already initialised
            let _ = host.set(normalize_host(h));
        }
        
        Ok(Self { client, config, host })
    }
    
    pub fn index_name(&self) -> &str {
        &self.config.index_name
    }
    
    async fn host(&self) -> Result<&str> {
        let host = self
            .host
            .get_or_try_init(|| async {
                let url = format!(
                    "{}/indexes/{}",
                    self.config.control_plane_url.trim_end_matches('/'),
                    self.config.index_name
                );
                let response = self
                    .client
                    .get(&url)
                    .header("Api-Key", &self.config.api_key)
                    .header("X-Pinecone-API-Version", API_VERSION)
                    .send()
                    .await?;
                
                if !response.status().is_success() {
                    return Err(VectorError::from_response("pinecone", response).await);
                }
                
                let description: IndexDescription = response.json().await?;
                info!(index = %self.config.index_name, host = %description.host, "Resolved Pinecone index host");
                Ok(normalize_host(&description.host))
            })
            .await?;
        Ok(host.as_str())
    }
    
    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.host().await?, path);
        let response = self
            .client
            .post(&url)
            .header("Api-Key", &self.config.api_key)
            .header("X-Pinecone-API-Version", API_VERSION)
            .json(body)
            .send()
            .await?;
        
        if !response.status().is_success() {
            return Err(VectorError::from_response("pinecone", response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl VectorStore for PineconeClient {
    async fn query(&self, vector: &[f32], top_k: usize) -> Result<Vec<ContextItem>> {
        let body = json!({
            "vector": vector,
            "topK": top_k,
            "includeMetadata": true,
            "includeValues": false,
            "namespace": self.config.namespace,
        });
        
        let response: QueryResponse = self.post("/query", &body).await?.json().await?;
        let items: Vec<ContextItem> = response
            .matches
            .into_iter()
            .filter_map(|m| ContextItem::from_match(m.id, m.score, m.metadata))
            .collect();
        
        debug!(count = items.len(), "Pinecone query returned context items");
        Ok(items)
    }
    
    async fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let body = json!({
            "vectors": records,
            "namespace": self.config.namespace,
        });
        let response: UpsertResponse = self.post("/vectors/upsert", &body).await?.json().await?;
        Ok(response.upserted_count)
    }
    
    async fn delete(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let body = json!({
            "ids": ids,
            "namespace": self.config.namespace,
        });
        self.post("/vectors/delete", &body).await?;
        Ok(())
    }
    
    async fn stats(&self) -> Result<IndexStats> {
        let stats: IndexStats = self
            .post("/describe_index_stats", &json!({}))
            .await?
            .json()
            .await?;
        Ok(stats)
    }
    
    fn name(&self) -> &str {
        "pinecone"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("idx-abc.svc.pinecone.io"), "https://idx-abc.svc.pinecone.io");
        assert_eq!(normalize_host("http://127.0.0.1:5080/"), "http://127.0.0.1:5080");
    }

    #[test]
    fn test_requires_api_key() {
        assert!(PineconeClient::new(PineconeConfig::new("", "tractors")).is_err());
        assert!(PineconeClient::new(PineconeConfig::new("key", "")).is_err());
        assert!(PineconeClient::new(PineconeConfig::new("key", "").with_host("h")).is_ok());
    }
}
