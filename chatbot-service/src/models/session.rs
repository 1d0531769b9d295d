//! Conversation session held in memory by the chat service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persona used when a session has not been given its own system prompt.
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
당신은 CloudBread의 친근하고 도움이 되는 AI 어시스턴트입니다.
사용자의 질문에 정확하고 유용한 답변을 제공하며,
이미지가 포함된 경우 이미지의 내용을 분석하여 관련된 정보를 제공합니다.
항상 한국어로 대답하며, 예의 바르고 친근한 톤을 유지합니다.
당신의 역할은 임산부 맞춤 음식, 영양, 건강 관리 전문가입니다.
사용자는 임산부이며 임산부의 건강과 영양에 최적화된 맞춤형 답변을 제공해야 합니다.";

pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A message in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Per-session model configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSettings {
    pub temperature: f32,
    pub system_prompt: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
        }
    }
}

/// A conversation session that maintains context across multiple requests.
#[derive(Debug, Clone)]
pub struct Session {
    pub session_id: String,
    pub messages: Vec<ChatMessage>,
    /// Completed text exchanges replayed to the model on later turns. Failed
    /// turns and image turns never enter it.
    pub context: Vec<ChatMessage>,
    pub settings: ModelSettings,
    pub created_at: DateTime<Utc>,
    /// Bumped on every append; drives idle eviction.
    pub last_active_at: DateTime<Utc>,
}

impl Session {
    pub fn new(session_id: String, settings: ModelSettings, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            messages: Vec::new(),
            context: Vec::new(),
            settings,
            created_at: now,
            last_active_at: now,
        }
    }

    pub fn add_message(&mut self, role: Role, content: String, now: DateTime<Utc>) {
        self.messages.push(ChatMessage {
            role,
            content,
            timestamp: now,
        });
        self.last_active_at = now;
    }

    pub fn add_exchange(&mut self, user: String, assistant: String, now: DateTime<Utc>) {
        self.context.push(ChatMessage {
            role: Role::User,
            content: user,
            timestamp: now,
        });
        self.context.push(ChatMessage {
            role: Role::Assistant,
            content: assistant,
            timestamp: now,
        });
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            created_at: self.created_at,
            message_count: self.messages.len(),
        }
    }
}

/// Listing entry for `GET /chat/sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub message_count: usize,
}
