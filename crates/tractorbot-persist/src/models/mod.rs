mod session;

pub use session::{MessageRole, Session, SessionMessage, MAX_HISTORY};
