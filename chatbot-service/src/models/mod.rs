//! Domain models for the chat service.

pub mod session;

pub use session::{
    ChatMessage, ModelSettings, Role, Session, SessionSummary, DEFAULT_SYSTEM_PROMPT,
    DEFAULT_TEMPERATURE,
};
