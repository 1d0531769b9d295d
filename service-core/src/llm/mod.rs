//! Chat-completion provider abstraction shared by the chatbot and the photo
//! labeler.
//!
//! Services depend on [`ChatModel`] only; the OpenAI client and the mock are
//! chosen at startup from configuration.

pub mod mock;
pub mod openai;

pub use mock::MockChatModel;
pub use openai::{OpenAiChatModel, OpenAiConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Provider returned no content")]
    EmptyResponse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

/// One part of a prompt message.
#[derive(Debug, Clone, PartialEq)]
pub enum MessagePart {
    Text(String),
    /// `https://` URL or `data:<mime>;base64,<payload>` URL.
    ImageUrl(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub parts: Vec<MessagePart>,
}

impl PromptMessage {
    pub fn text(role: PromptRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![MessagePart::Text(text.into())],
        }
    }

    pub fn system(text: impl Into<String>) -> Self {
        Self::text(PromptRole::System, text)
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::text(PromptRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::text(PromptRole::Assistant, text)
    }

    /// A user message carrying text and one image.
    pub fn user_with_image(text: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            parts: vec![
                MessagePart::Text(text.into()),
                MessagePart::ImageUrl(image_url.into()),
            ],
        }
    }

    /// Concatenated text parts, ignoring images.
    pub fn text_content(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| match p {
                MessagePart::Text(t) => Some(t.as_str()),
                MessagePart::ImageUrl(_) => None,
            })
            .collect::<Vec<_>>()
            .join("")
    }
}

/// A single completion call.
#[derive(Debug, Clone, Default)]
pub struct CompletionRequest {
    pub messages: Vec<PromptMessage>,
    pub temperature: Option<f32>,
}

/// Trait for chat-completion providers.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Return the assistant's reply text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Model identifier, used for logging and metrics labels.
    fn model_name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_content_skips_images() {
        let msg = PromptMessage::user_with_image("이 음식은?", "https://example.com/a.jpg");
        assert_eq!(msg.text_content(), "이 음식은?");
        assert_eq!(msg.role, PromptRole::User);
        assert_eq!(msg.parts.len(), 2);
    }
}
