use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

use tracing::{info, warn};
use tractorbot_context::{
    build_messages, classify, Command, ContextInfo, ContextTable, PromptBuilder, APOLOGY_TEXT,
    HELP_TEXT, TRANSLATION_UNAVAILABLE_TEXT, WELCOME_TEXT,
};
use tractorbot_llm::{ChatClient, ChatOptions, ChatRequest};
use tractorbot_persist::{MessageRole, Session, SessionStore};
use tractorbot_vector::VectorDb;

use super::translator::Translator;
use crate::cache::TtlCache;
use crate::error::{ApiError, ApiResult};

pub const MAX_MESSAGE_CHARS: usize = 1000;

/// One validated inbound message
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub message: String,
    pub session_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub context: String,
    pub suggested_actions: Vec<String>,
    pub session_id: String,
}

/// Per-request generation settings
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub model: String,
    pub options: ChatOptions,
    pub top_k: usize,
    pub history_messages: usize,
    /// Deadline for retrieval, the model call and translation of one reply
    pub reply_timeout: Duration,
}

impl GenerationSettings {
    /// Reply budget that still leaves room for the session write inside the request timeout
    pub fn reply_budget(request_timeout: Duration) -> Duration {
        request_timeout.mul_f64(0.75).max(Duration::from_millis(100))
    }
}

/// Classifies, retrieves, prompts and records each chat turn
pub struct ChatService {
    llm: Option<Arc<dyn ChatClient>>,
    contexts: Arc<ContextTable>,
    prompt: PromptBuilder,
    vector_db: Option<VectorDb>,
    retrieval_cache: TtlCache<Vec<String>>,
    translator: Option<Arc<Translator>>,
    sessions: Arc<dyn SessionStore>,
    settings: GenerationSettings,
}

/// Check a raw message against the length rules
pub fn validate_message(message: Option<String>) -> ApiResult<String> {
    let message = message.ok_or_else(|| ApiError::BadRequest("Message field required".to_string()))?;
    if message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }
    if message.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ApiError::BadRequest("Message too long".to_string()));
    }
    Ok(message)
}

impl ChatService {
    pub fn new(
        contexts: Arc<ContextTable>,
        sessions: Arc<dyn SessionStore>,
        settings: GenerationSettings,
        cache_ttl: Duration,
    ) -> Self {
        Self {
            llm: None,
            contexts,
            prompt: PromptBuilder::default(),
            vector_db: None,
            retrieval_cache: TtlCache::new(cache_ttl),
            translator: None,
            sessions,
            settings,
        }
    }
    
    pub fn with_llm(mut self, llm: Arc<dyn ChatClient>) -> Self {
        self.llm = Some(llm);
        self
    }
    
    pub fn with_vector_db(mut self, vector_db: VectorDb) -> Self {
        self.vector_db = Some(vector_db);
        self
    }
    
    pub fn with_translator(mut self, translator: Arc<Translator>) -> Self {
        self.translator = Some(translator);
        self
    }
    
    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }
    
    pub fn ai_available(&self) -> bool {
        self.llm.is_some()
    }
    
    pub fn vector_db(&self) -> Option<&VectorDb> {
        self.vector_db.as_ref()
    }
    
    pub fn retrieval_cache(&self) -> &TtlCache<Vec<String>> {
        &self.retrieval_cache
    }
    
    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }
    
    async fn load_session(&self, id: Option<&str>) -> ApiResult<Session> {
        let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
            return Ok(Session::generate());
        };
        Ok(self
            .sessions
            .get(id)
            .await?
            .unwrap_or_else(|| Session::new(id)))
    }
    
    pub async fn handle(&self, turn: ChatTurn) -> ApiResult<ChatReply> {
        let mut session = self.load_session(turn.session_id.as_deref()).await?;
        
        let response = match Command::parse(&turn.message) {
            Some(command) => self.run_command(command, &mut session),
            None => {
                let llm = self
                    .llm
                    .as_ref()
                    .ok_or_else(|| ApiError::ServiceUnavailable("AI service is not available".to_string()))?;
                
                let deadline = Instant::now() + self.settings.reply_timeout;
                let context = classify(&self.contexts, &turn.message).clone();
                let reply = match timeout_at(
                    deadline,
                    self.generate(llm.as_ref(), &session, &context, &turn.message),
                )
                .await
                {
                    Ok(reply) => reply,
                    Err(_) => {
                        warn!(
                            timeout_ms = self.settings.reply_timeout.as_millis() as u64,
                            "Reply generation timed out"
                        );
                        APOLOGY_TEXT.to_string()
                    }
                };
                let reply = match (&self.translator, session.language.as_deref()) {
                    (Some(t), Some(lang)) if !lang.eq_ignore_ascii_case("en") => {
                        let translated = timeout_at(deadline, t.translate_or_original(&reply, lang)).await;
                        match translated {
                            Ok(translated) => translated,
                            Err(_) => {
                                warn!("Translation timed out; sending the original reply");
                                reply
                            }
                        }
                    }
                    _ => reply,
                };
                
                session.apply_context(&context);
                session.push_message(MessageRole::User, turn.message.as_str());
                session.push_message(MessageRole::Assistant, reply.as_str());
                reply
            }
        };
        
        session.touch();
        self.sessions.save(&session).await?;
        
        let current = session
            .context
            .clone()
            .unwrap_or_else(|| self.contexts.general().clone());
        
        Ok(ChatReply {
            response,
            context: current.name,
            suggested_actions: current.actions,
            session_id: session.id,
        })
    }
    
    fn run_command(&self, command: Command, session: &mut Session) -> String {
        info!(session_id = %session.id, command = ?command, "Handling chat command");
        match command {
            Command::Help => HELP_TEXT.to_string(),
            Command::Clear => {
                session.reset();
                WELCOME_TEXT.to_string()
            }
            Command::Translate(lang) => {
                if self.translator.is_some() {
                    let reply = format!("🌐 Translation language set to: {}", lang);
                    session.language = Some(lang);
                    reply
                } else {
                    TRANSLATION_UNAVAILABLE_TEXT.to_string()
                }
            }
        }
    }
    
    /// Top-k snippet texts for `query`; failures yield nothing
    pub async fn retrieve(&self, query: &str) -> Vec<String> {
        let Some(db) = &self.vector_db else {
            return Vec::new();
        };
        
        let key = query.trim().to_lowercase();
        if let Some(hit) = self.retrieval_cache.get(&key).await {
            return hit;
        }
        
        match db.query_context(query, self.settings.top_k).await {
            Ok(items) => {
                let texts: Vec<String> = items.into_iter().map(|i| i.text).collect();
                info!(count = texts.len(), "Found context items");
                self.retrieval_cache.set(key, texts.clone(), None).await;
                texts
            }
            Err(e) => {
                warn!("Vector query failed: {}", e);
                Vec::new()
            }
        }
    }
    
    async fn generate(
        &self,
        llm: &dyn ChatClient,
        session: &Session,
        context: &ContextInfo,
        message: &str,
    ) -> String {
        let snippets = self.retrieve(message).await;
        let system_prompt = self.prompt.render(context, &snippets);
        let history = session.recent_history(self.settings.history_messages);
        let messages = build_messages(system_prompt, &history, message);
        
        let request = ChatRequest::new(self.settings.model.clone(), messages)
            .with_options(self.settings.options.clone());
        
        match llm.chat(request).await {
            Ok(response) => match response.text() {
                Some(text) => text.to_string(),
                None => {
                    warn!(finish_reason = ?response.finish_reason, "Model returned an empty reply");
                    APOLOGY_TEXT.to_string()
                }
            },
            Err(e) => {
                tracing::error!("Error generating AI response: {:#}", e);
                APOLOGY_TEXT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_message() {
        assert!(matches!(
            validate_message(None),
            Err(ApiError::BadRequest(m)) if m == "Message field required"
        ));
        assert!(matches!(
            validate_message(Some("   ".to_string())),
            Err(ApiError::BadRequest(m)) if m == "Message cannot be empty"
        ));
        assert!(matches!(
            validate_message(Some("x".repeat(MAX_MESSAGE_CHARS + 1))),
            Err(ApiError::BadRequest(m)) if m == "Message too long"
        ));
        assert_eq!(validate_message(Some("x".repeat(MAX_MESSAGE_CHARS))).unwrap().len(), MAX_MESSAGE_CHARS);
        // limit counts characters, not bytes
        assert!(validate_message(Some("ट".repeat(MAX_MESSAGE_CHARS))).is_ok());
    }

    #[test]
    fn test_reply_budget_is_below_request_timeout() {
        assert_eq!(GenerationSettings::reply_budget(Duration::from_secs(60)), Duration::from_secs(45));
        assert!(GenerationSettings::reply_budget(Duration::from_secs(1)) < Duration::from_secs(1));
        assert_eq!(GenerationSettings::reply_budget(Duration::ZERO), Duration::from_millis(100));
    }
}
