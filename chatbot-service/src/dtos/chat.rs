use crate::models::{ChatMessage, SessionSummary};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub message: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub session_id: Option<String>,
    /// Replaces the session's system prompt for this and later turns.
    #[serde(default, deserialize_with = "blank_as_none")]
    pub system_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub session_id: String,
    pub message_history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
pub struct MultimodalChatResponse {
    pub response: String,
    pub session_id: String,
    pub message_history: Vec<ChatMessage>,
    pub image_processed: bool,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub session_id: String,
    pub message_history: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub active_sessions: Vec<SessionSummary>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Clients send `""` as often as they omit the field.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}
