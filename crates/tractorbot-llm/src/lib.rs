pub mod types;
pub mod traits;
pub mod retry;
pub mod config;
pub mod openai;

pub use traits::{
    ChatClient,
    ChatRequest, ChatResponse, ChatOptions,
    TokenUsage,
};

pub use config::{ClientFactory, ProviderConfig, ProviderType};
pub use openai::OpenAIClient;
pub use retry::RetryPolicy;
pub use types::{Message, Role};
