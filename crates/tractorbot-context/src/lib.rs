//! Deciding what a customer message is about and what to tell the model.
//!
//! A [`ContextTable`] is loaded once from a small INI-like file. Each message
//! is matched against the table's triggers by [`classify`], chat commands are
//! recognised by [`Command::parse`], and [`PromptBuilder`] turns the chosen
//! context plus retrieved snippets into the system prompt.

mod classifier;
mod commands;
mod error;
pub mod fuzz;
mod prompt;
mod table;
mod templates;

pub use classifier::classify;
pub use commands::Command;
pub use error::{ContextError, Result};
pub use prompt::{build_messages, HistoryEntry, PromptBuilder};
pub use table::{ContextInfo, ContextTable, GENERAL, WILDCARD};
pub use templates::{
    APOLOGY_TEXT, DEFAULT_SYSTEM_PROMPT_TEMPLATE, FALLBACK_PRODUCT_INFO, HELP_TEXT,
    TRANSLATION_UNAVAILABLE_TEXT, WELCOME_TEXT,
};
