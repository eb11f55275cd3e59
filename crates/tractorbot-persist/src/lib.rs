pub mod models;
pub mod store;
pub mod error;
pub mod dbs;

pub use models::{MessageRole, Session, SessionMessage, MAX_HISTORY};
pub use store::SessionStore;
pub use error::{PersistError, Result};
pub use dbs::memory::{InMemorySessionStore, DEFAULT_SESSION_TTL};

#[cfg(feature = "mongodb")]
pub use dbs::mongo::MongoSessionStore;
