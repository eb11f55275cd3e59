use tractorbot_llm::Message;

use crate::table::ContextInfo;
use crate::templates::{DEFAULT_SYSTEM_PROMPT_TEMPLATE, FALLBACK_PRODUCT_INFO};

const DEFAULT_DESCRIPTION: &str = "Default conversational mode";
const DEFAULT_RESPONSE_FORMAT: &str = "Friendly, helpful response";

/// Renders the system prompt for a context
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    template: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT_TEMPLATE)
    }
}

impl PromptBuilder {
    pub fn new(template: impl Into<String>) -> Self {
        Self { template: template.into() }
    }
    
    /// Snippets joined by newlines, or the fixed product paragraph when there are none
    pub fn product_info<S: AsRef<str>>(snippets: &[S]) -> String {
        if snippets.is_empty() {
            return FALLBACK_PRODUCT_INFO.to_string();
        }
        snippets
            .iter()
            .map(|s| s.as_ref())
            .collect::<Vec<_>>()
            .join("\n")
    }
    
    pub fn render<S: AsRef<str>>(&self, context: &ContextInfo, snippets: &[S]) -> String {
        let response_format = context
            .response_format
            .as_deref()
            .unwrap_or(DEFAULT_RESPONSE_FORMAT);
        let description = match context.description.trim() {
            "" => DEFAULT_DESCRIPTION,
            d => d,
        };
        
        self.template
            .replace("{context_name}", &context.name)
            .replace("{context_description}", description)
            .replace("{context_actions}", &context.actions.join(", "))
            .replace("{response_format}", response_format)
            .replace("{product_info}", &Self::product_info(snippets))
    }
}

/// A prior turn included in the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryEntry {
    User(String),
    Assistant(String),
}

/// System prompt, then prior turns oldest first, then the new user message
pub fn build_messages(system_prompt: String, history: &[HistoryEntry], user_message: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    for entry in history {
        messages.push(match entry {
            HistoryEntry::User(text) => Message::user(text.as_str()),
            HistoryEntry::Assistant(text) => Message::assistant(text.as_str()),
        });
    }
    messages.push(Message::user(user_message));
    messages
}
