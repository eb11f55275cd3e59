// Configuration layer for provider-agnostic LLM client creation

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::openai::{OpenAIClient, GROQ_API_BASE, OPENAI_API_BASE};
use crate::retry::RetryPolicy;
use crate::traits::ChatClient;

/// Type of LLM provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    #[default]
    Groq,
}

impl ProviderType {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => OPENAI_API_BASE,
            ProviderType::Groq => GROQ_API_BASE,
        }
    }
}

/// Complete provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub provider: ProviderType,
    pub api_key: String,
    /// Overrides the provider's default base URL (proxies, local gateways)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Create OpenAI provider config
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::OpenAI,
            api_key: api_key.into(),
            base_url: None,
        }
    }
    
    /// Create Groq provider config
    pub fn groq(api_key: impl Into<String>) -> Self {
        Self {
            provider: ProviderType::Groq,
            api_key: api_key.into(),
            base_url: None,
        }
    }
    
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
    
    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        self.provider
    }
    
    /// Base URL the client will talk to
    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client from provider configuration
    pub fn create_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        Self::create_client_with_retry(config, RetryPolicy::default())
    }
    
    pub fn create_client_with_retry(
        config: ProviderConfig,
        retry: RetryPolicy,
    ) -> Result<Arc<dyn ChatClient>> {
        let client = OpenAIClient::with_base_url(config.api_key.clone(), config.resolved_base_url())?
            .with_retry(retry);
        Ok(Arc::new(client))
    }
}
