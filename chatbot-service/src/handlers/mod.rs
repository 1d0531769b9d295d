pub mod chat;
pub mod health;
pub mod sessions;

pub use chat::{chat, chat_multimodal};
pub use health::{health_check, metrics, root};
pub use sessions::{delete_session, get_history, list_sessions};
