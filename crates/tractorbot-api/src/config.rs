use config::{Config as ConfigLoader, ConfigError, File};
use serde::Deserialize;
use std::path::Path;
use tractorbot_llm::ProviderType;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub vector: VectorConfig,
    pub context: ContextConfig,
    pub session: SessionConfig,
    pub rate_limit: RateLimitConfig,
    pub translator: TranslatorConfig,
    pub maintenance: MaintenanceConfig,
    pub logging: LoggingConfig,
    
    // Secrets (from ENV only)
    #[serde(skip)]
    pub secrets: Secrets,
}

#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub llm_api_key: Option<String>,
    pub pinecone_api_key: Option<String>,
    pub embedding_api_key: Option<String>,
    pub translator_key: Option<String>,
    /// Required in `X-API-Key` when set
    pub api_key: Option<String>,
    pub mongodb_uri: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub provider: ProviderType,
    pub model: String,
    pub base_url: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Prior session messages sent with each request
    pub history_messages: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: ProviderType::Groq,
            model: "llama-3.3-70b-versatile".to_string(),
            base_url: None,
            temperature: 0.7,
            max_tokens: 500,
            history_messages: 6,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VectorConfig {
    pub index_name: String,
    /// Data-plane host; looked up from the index name when empty
    pub host: Option<String>,
    pub namespace: String,
    pub dimension: usize,
    pub top_k: usize,
    pub cache_ttl_secs: u64,
    pub embedding_base_url: String,
    pub embedding_model: String,
    /// Use the in-memory store when Pinecone is not configured
    pub memory_fallback: bool,
}

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            index_name: "captain-tractors".to_string(),
            host: None,
            namespace: String::new(),
            dimension: 384,
            top_k: 3,
            cache_ttl_secs: 300,
            embedding_base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            memory_fallback: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub file: String,
    /// Preloaded into the in-memory store at startup
    pub seed_file: Option<String>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            file: "data/contexts.txt".to_string(),
            seed_file: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ttl_hours: u64,
    pub database: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24,
            database: "tractorbot".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests: u32,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests: 60,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub endpoint: String,
    pub region: Option<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.cognitive.microsofttranslator.com".to_string(),
            region: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    pub purge_interval_secs: u64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self { purge_interval_secs: 60 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Environment variables that override individual keys
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_REQUEST_TIMEOUT_SECS", "server.request_timeout_secs"),
    ("LLM_PROVIDER", "llm.provider"),
    ("LLM_MODEL", "llm.model"),
    ("LLM_BASE_URL", "llm.base_url"),
    ("LLM_TEMPERATURE", "llm.temperature"),
    ("LLM_MAX_TOKENS", "llm.max_tokens"),
    ("VECTOR_INDEX_NAME", "vector.index_name"),
    ("VECTOR_HOST", "vector.host"),
    ("VECTOR_NAMESPACE", "vector.namespace"),
    ("VECTOR_DIMENSION", "vector.dimension"),
    ("VECTOR_TOP_K", "vector.top_k"),
    ("VECTOR_MEMORY_FALLBACK", "vector.memory_fallback"),
    ("VECTOR_EMBEDDING_MODEL", "vector.embedding_model"),
    ("VECTOR_EMBEDDING_BASE_URL", "vector.embedding_base_url"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
    ("RATE_LIMIT_ENABLED", "rate_limit.enabled"),
    ("RATE_LIMIT_REQUESTS", "rate_limit.requests"),
    ("RATE_LIMIT_WINDOW_SECS", "rate_limit.window_secs"),
];

fn env_secret(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

impl Secrets {
    pub fn from_env() -> Self {
        Self {
            llm_api_key: env_secret(&["LLM_API_KEY", "GROQ_API_KEY", "OPENAI_API_KEY"]),
            pinecone_api_key: env_secret(&["PINECONE_API_KEY"]),
            embedding_api_key: env_secret(&["EMBEDDING_API_KEY"]),
            translator_key: env_secret(&["AZURE_TRANSLATOR_KEY"]),
            api_key: env_secret(&["API_KEY"]),
            mongodb_uri: env_secret(&["MONGODB_URI"]),
        }
    }
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, LLM_, VECTOR_, LOG_, RATE_ prefixes)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());
        
        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));
        
        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }
        
        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.secrets = Secrets::from_env();
        cfg.validate()?;
        Ok(cfg)
    }
    
    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let cfg: Config = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }
    
    fn validate(&self) -> Result<(), ConfigError> {
        if self.rate_limit.enabled && (self.rate_limit.requests == 0 || self.rate_limit.window_secs == 0) {
            return Err(ConfigError::Message(
                "rate_limit.requests and rate_limit.window_secs must be positive".to_string(),
            ));
        }
        if self.vector.top_k == 0 {
            return Err(ConfigError::Message("vector.top_k must be positive".to_string()));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::Message(format!(
                "logging.format must be \"pretty\" or \"json\", got \"{}\"",
                self.logging.format
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 3000

            [cors]
            enabled = true
            origins = ["http://localhost:3000"]

            [llm]
            provider = "openai"
            model = "gpt-4o-mini"
            temperature = 0.2
            max_tokens = 256

            [rate_limit]
            requests = 10
            window_secs = 30

            [logging]
            level = "debug"
            format = "json"
        "#;

        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.llm.provider, ProviderType::OpenAI);
        assert_eq!(config.llm.max_tokens, 256);
        assert_eq!(config.rate_limit.requests, 10);
        // untouched sections keep their defaults
        assert_eq!(config.vector.top_k, 3);
        assert_eq!(config.vector.cache_ttl_secs, 300);
        assert_eq!(config.session.ttl_hours, 24);
        assert!(config.secrets.llm_api_key.is_none());
    }

    #[test]
    fn test_defaults_match_chat_behaviour() {
        let config = Config::default();
        assert_eq!(config.llm.provider, ProviderType::Groq);
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.llm.max_tokens, 500);
        assert_eq!(config.rate_limit.requests, 60);
        assert_eq!(config.rate_limit.window_secs, 60);
        assert_eq!(config.maintenance.purge_interval_secs, 60);
    }

    #[test]
    fn test_from_file_validates() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "[logging]\nformat = \"xml\"\n").unwrap();
        let err = Config::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("logging.format"));

        let mut ok = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(ok, "[server]\nport = 9000\n").unwrap();
        assert_eq!(Config::from_file(ok.path()).unwrap().server.port, 9000);
    }

    #[test]
    fn test_embedding_settings_overridable_from_env() {
        let keys: Vec<_> = ENV_OVERRIDES.iter().map(|(_, key)| *key).collect();
        assert!(keys.contains(&"vector.embedding_model"));
        assert!(keys.contains(&"vector.embedding_base_url"));

        let cfg: Config = ConfigLoader::builder()
            .set_override_option("vector.embedding_model", Some("text-embedding-3-large"))
            .unwrap()
            .set_override_option("vector.dimension", Some(1024))
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(cfg.vector.embedding_model, "text-embedding-3-large");
        assert_eq!(cfg.vector.dimension, 1024);
    }
}
