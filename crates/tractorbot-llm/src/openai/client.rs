// OpenAI-compatible chat completions client (OpenAI, Groq, local gateways)

use crate::retry::RetryPolicy;
use crate::traits::{ChatClient, ChatOptions, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// OpenAI-compatible client (HTTP direct, no SDK)
pub struct OpenAIClient {
    http_client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl OpenAIClient {
    /// Create new client against the OpenAI API
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, OPENAI_API_BASE)
    }
    
    /// Create new client against the Groq OpenAI-compatible endpoint
    pub fn groq(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, GROQ_API_BASE)
    }
    
    /// Create new client against any OpenAI-compatible base URL
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            anyhow::bail!("API key is empty");
        }
        
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", api_key))
                .context("Invalid API key format")?,
        );
        
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;
        
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        })
    }
    
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
    
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
    
    /// Build chat completion request payload
    fn build_chat_request(
        &self,
        model: &str,
        messages: Vec<Message>,
        options: &ChatOptions,
    ) -> Value {
        let openai_messages: Vec<Value> = messages
            .into_iter()
            .map(|msg| self.convert_message(msg))
            .collect();
        
        let mut obj = Map::new();
        obj.insert("model".to_string(), Value::from(model));
        obj.insert("messages".to_string(), Value::Array(openai_messages));
        obj.insert("stream".to_string(), Value::Bool(false));
        
        if let Some(temp) = options.temperature {
            obj.insert("temperature".to_string(), serde_json::json!(temp));
        }
        if let Some(max_tokens) = options.max_tokens {
            obj.insert("max_tokens".to_string(), serde_json::json!(max_tokens));
        }
        
        Value::Object(obj)
    }
    
    fn convert_message(&self, message: Message) -> Value {
        let mut obj = Map::new();
        obj.insert("role".to_string(), Value::String(message.role.to_string()));
        obj.insert("content".to_string(), Value::String(message.content));
        Value::Object(obj)
    }
    
    async fn post_with_retry(&self, url: &str, payload: &Value) -> Result<reqwest::Response> {
        let mut attempt = 1;
        loop {
            let result = self.http_client.post(url).json(payload).send().await;
            
            match result {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) => {
                    let status = response.status();
                    if RetryPolicy::is_retryable(status) && attempt < self.retry.max_attempts {
                        let delay = self.retry.delay_for(attempt);
                        tracing::warn!(
                            status = %status,
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "LLM request failed, retrying"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }
                    let error_text = response.text().await.unwrap_or_default();
                    anyhow::bail!("LLM API error ({}): {}", status, error_text);
                }
                Err(e) if (e.is_timeout() || e.is_connect()) && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(error = %e, attempt, "LLM request failed, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e).context("Failed to send request"),
            }
        }
    }
}

#[async_trait]
impl ChatClient for OpenAIClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_chat_request(
            &request.model,
            request.messages,
            &request.options,
        );
        
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %request.model, "Sending chat completion request");
        
        let response = self.post_with_retry(&url, &payload).await?;
        
        let raw: OpenAIChatResponse = response
            .json()
            .await
            .context("Failed to parse response")?;
        
        // Convert to provider-agnostic response
        let choice = raw.choices.first();
        Ok(ChatResponse {
            content: choice.and_then(|c| c.message.content.clone()),
            usage: raw.usage.as_ref().map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
            finish_reason: choice.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }
}

// ============================================================================
// OPENAI-SPECIFIC RESPONSE TYPES (for Chat Completions)
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAIChatResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_api_key_rejected() {
        assert!(OpenAIClient::new("").is_err());
        assert!(OpenAIClient::groq("   ").is_err());
    }

    #[test]
    fn test_payload_shape() {
        let client = OpenAIClient::groq("test-key").unwrap();
        let payload = client.build_chat_request(
            "llama-3.3-70b-versatile",
            vec![Message::system("be brief"), Message::user("hi")],
            &ChatOptions::new().temperature(0.7).max_tokens(500),
        );
        
        assert_eq!(payload["model"], "llama-3.3-70b-versatile");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["role"], "user");
        assert_eq!(payload["messages"][1]["content"], "hi");
        assert_eq!(payload["max_tokens"], 500);
        assert!(payload.get("temperature").is_some());
    }

    #[test]
    fn test_optional_fields_omitted() {
        let client = OpenAIClient::new("test-key").unwrap();
        let payload = client.build_chat_request("gpt-4o-mini", vec![Message::user("hi")], &ChatOptions::default());
        assert!(payload.get("temperature").is_none());
        assert!(payload.get("max_tokens").is_none());
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = OpenAIClient::with_base_url("k", "http://localhost:1234/v1/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234/v1");
    }
}
