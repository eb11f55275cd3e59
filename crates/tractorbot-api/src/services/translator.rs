use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const API_VERSION: &str = "3.0";

/// Azure Translator (v3 REST) client
pub struct Translator {
    client: Client,
    endpoint: String,
    key: String,
    region: Option<String>,
}

#[derive(Deserialize)]
struct TranslationResult {
    translations: Vec<Translation>,
}

#[derive(Deserialize)]
struct Translation {
    text: String,
}

impl Translator {
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>, region: Option<String>) -> Result<Self> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(anyhow!("translator key not provided"));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            key,
            region: region.filter(|r| !r.trim().is_empty()),
        })
    }
    
    pub async fn translate(&self, text: &str, to: &str) -> Result<String> {
        let url = format!("{}/translate", self.endpoint);
        let mut request = self
            .client
            .post(&url)
            .query(&[("api-version", API_VERSION), ("to", to)])
            .header("Ocp-Apim-Subscription-Key", &self.key)
            .json(&json!([{ "Text": text }]));
        if let Some(region) = &self.region {
            request = request.header("Ocp-Apim-Subscription-Region", region);
        }
        
        let response = request.send().await.context("translator request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("translator returned {}: {}", status, body));
        }
        
        let results: Vec<TranslationResult> = response.json().await?;
        results
            .into_iter()
            .next()
            .and_then(|r| r.translations.into_iter().next())
            .map(|t| t.text)
            .ok_or_else(|| anyhow!("translator returned no translations"))
    }
    
    /// Translate, falling back to the input on any failure
    pub async fn translate_or_original(&self, text: &str, to: &str) -> String {
        match self.translate(text, to).await {
            Ok(translated) => translated,
            Err(e) => {
                tracing::error!("Translation error: {:#}", e);
                text.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    #[tokio::test]
    async fn test_translate() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/translate")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("api-version".into(), "3.0".into()),
                Matcher::UrlEncoded("to".into(), "hi".into()),
            ]))
            .match_header("Ocp-Apim-Subscription-Key", "secret")
            .match_header("Ocp-Apim-Subscription-Region", "centralindia")
            .match_body(Matcher::Json(json!([{"Text": "Hello"}])))
            .with_status(200)
            .with_body(r#"[{"translations":[{"text":"नमस्ते","to":"hi"}]}]"#)
            .create_async()
            .await;

        let translator = Translator::new(server.url(), "secret", Some("centralindia".to_string())).unwrap();
        assert_eq!(translator.translate("Hello", "hi").await.unwrap(), "नमस्ते");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_failure_returns_original() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/translate")
            .match_query(Matcher::Any)
            .with_status(401)
            .create_async()
            .await;

        let translator = Translator::new(server.url(), "bad", None).unwrap();
        assert!(translator.translate("Hello", "ta").await.is_err());
        assert_eq!(translator.translate_or_original("Hello", "ta").await, "Hello");
    }

    #[test]
    fn test_requires_key() {
        assert!(Translator::new("https://example.com", " ", None).is_err());
    }
}
