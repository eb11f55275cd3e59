pub mod chat;
pub mod translator;

pub use chat::{ChatReply, ChatService, ChatTurn};
pub use translator::Translator;
