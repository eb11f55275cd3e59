use anyhow::Context;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use tractorbot_context::ContextTable;
use tractorbot_llm::{ChatClient, ChatOptions, ClientFactory, ProviderConfig};
use tractorbot_persist::{InMemorySessionStore, SessionStore};
use tractorbot_vector::{
    ChunkStrategy, Embedder, HashEmbedder, InMemoryVectorStore, OpenAIEmbedder, PineconeClient,
    PineconeConfig, VectorDb, VectorStore,
};

use crate::{
    config::{Config, CorsConfig},
    middleware::{auth, logging, rate_limit, timeout},
    routes::{chat, docs, health},
    services::{chat::GenerationSettings, ChatService, Translator},
    state::AppState,
};

pub fn build_router(state: Arc<AppState>) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);
    
    Router::new()
        .route("/health", get(health::health_check))
        .route("/chat", post(chat::chat))
        .route("/api-docs/openapi.json", get(docs::openapi_json))
        .layer(middleware::from_fn_with_state(state.clone(), auth::require_api_key))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit::enforce))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer(&state.config.cors))
                .layer(CompressionLayer::new())
                .layer(middleware::map_response(timeout::json_timeout))
                .layer(TimeoutLayer::new(request_timeout))
                .layer(middleware::from_fn(logging::log_request)),
        )
        .with_state(state)
}

fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    if !config.enabled {
        return CorsLayer::new();
    }
    
    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);
    
    if config.origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// LLM client from config; `None` when no API key is set
pub fn build_llm_client(config: &Config) -> anyhow::Result<Option<Arc<dyn ChatClient>>> {
    let Some(api_key) = config.secrets.llm_api_key.clone() else {
        warn!("No LLM API key configured; chat replies are disabled");
        return Ok(None);
    };
    
    let provider = ProviderConfig {
        provider: config.llm.provider,
        api_key,
        base_url: config.llm.base_url.clone(),
    };
    info!(provider = ?provider.provider, base_url = provider.resolved_base_url(), "Initializing LLM client");
    Ok(Some(ClientFactory::create_client(provider)?))
}

/// Embedder + store from config; `None` when neither Pinecone nor the memory fallback is configured
pub async fn build_vector_db(config: &Config) -> anyhow::Result<Option<VectorDb>> {
    let vector = &config.vector;
    
    let embedder: Arc<dyn Embedder> = match &config.secrets.embedding_api_key {
        Some(key) => Arc::new(OpenAIEmbedder::new(
            &vector.embedding_base_url,
            key,
            &vector.embedding_model,
            vector.dimension,
        )?),
        None => {
            warn!("No embedding API key configured; using hash embeddings without semantic meaning");
            Arc::new(HashEmbedder::new(vector.dimension))
        }
    };
    
    let store: Arc<dyn VectorStore> = match &config.secrets.pinecone_api_key {
        Some(key) => {
            let mut pinecone = PineconeConfig::new(key, &vector.index_name)
                .with_namespace(&vector.namespace);
            if let Some(host) = vector.host.as_deref().filter(|h| !h.trim().is_empty()) {
                pinecone = pinecone.with_host(host);
            }
            Arc::new(PineconeClient::new(pinecone)?)
        }
        None if vector.memory_fallback => {
            info!("Using in-memory vector store");
            Arc::new(InMemoryVectorStore::new(vector.dimension))
        }
        None => {
            warn!("No Pinecone API key configured; retrieval is disabled");
            return Ok(None);
        }
    };
    
    Ok(Some(VectorDb::new(embedder, store)))
}

/// Load `context.seed_file` into the process-local store; Pinecone is managed with the admin CLI
async fn seed_memory_store(config: &Config, db: &VectorDb) -> anyhow::Result<()> {
    let Some(seed) = &config.context.seed_file else {
        return Ok(());
    };
    if config.secrets.pinecone_api_key.is_some() {
        info!(file = %seed, "Skipping seed file; Pinecone index is managed with tractorbot-admin");
        return Ok(());
    }
    let ids = db
        .ingest_file(seed, ChunkStrategy::Numbered)
        .await
        .with_context(|| format!("failed to ingest {}", seed))?;
    info!(count = ids.len(), file = %seed, "Seeded vector store");
    Ok(())
}

pub async fn build_session_store(config: &Config) -> anyhow::Result<Arc<dyn SessionStore>> {
    let ttl = Duration::from_secs(config.session.ttl_hours * 60 * 60);
    
    #[cfg(feature = "mongodb")]
    {
        if let Some(uri) = &config.secrets.mongodb_uri {
            info!("Connecting to MongoDB");
            let store = tractorbot_persist::MongoSessionStore::connect(uri, &config.session.database)
                .await?
                .with_ttl(ttl);
            return Ok(Arc::new(store));
        }
    }
    
    #[cfg(not(feature = "mongodb"))]
    {
        if config.secrets.mongodb_uri.is_some() {
            warn!("MONGODB_URI is set but the mongodb feature is disabled; using in-memory sessions");
        }
    }
    
    Ok(Arc::new(InMemorySessionStore::new(ttl)))
}

/// Wire every service described by `config`
pub async fn build_state(config: Config) -> anyhow::Result<Arc<AppState>> {
    let contexts = Arc::new(ContextTable::load_or_default(&config.context.file));
    let sessions = build_session_store(&config).await?;
    
    let settings = GenerationSettings {
        model: config.llm.model.clone(),
        options: ChatOptions::new()
            .temperature(config.llm.temperature)
            .max_tokens(config.llm.max_tokens),
        top_k: config.vector.top_k,
        history_messages: config.llm.history_messages,
        reply_timeout: GenerationSettings::reply_budget(Duration::from_secs(config.server.request_timeout_secs)),
    };
    let mut chat = ChatService::new(
        contexts,
        sessions,
        settings,
        Duration::from_secs(config.vector.cache_ttl_secs),
    );
    
    if let Some(llm) = build_llm_client(&config)? {
        chat = chat.with_llm(llm);
    }
    match build_vector_db(&config).await {
        Ok(Some(db)) => {
            if let Err(e) = seed_memory_store(&config, &db).await {
                warn!("Seeding the vector store failed: {:#}", e);
            }
            chat = chat.with_vector_db(db);
        }
        Ok(None) => {}
        Err(e) => warn!("Vector DB initialization failed (optional): {:#}", e),
    }
    if let Some(key) = &config.secrets.translator_key {
        let translator = Translator::new(
            &config.translator.endpoint,
            key,
            config.translator.region.clone(),
        )?;
        info!("Azure Translator initialized");
        chat = chat.with_translator(Arc::new(translator));
    }
    
    Ok(Arc::new(AppState::new(config, chat)))
}

/// Periodically drop expired cache entries, sessions and idle rate-limit buckets
pub fn spawn_maintenance(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let period = Duration::from_secs(state.config.maintenance.purge_interval_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.tick().await;
        loop {
            interval.tick().await;
            
            let cache = state.chat.retrieval_cache().cleanup_expired().await;
            let sessions = match state.chat.sessions().purge_expired().await {
                Ok(n) => n,
                Err(e) => {
                    warn!("Session purge failed: {}", e);
                    0
                }
            };
            let clients = state.rate_limiter.as_ref().map(|l| l.cleanup()).unwrap_or(0);
            
            if cache + sessions + clients > 0 {
                info!(cache, sessions, clients, "Maintenance purge");
            }
        }
    })
}
