//! OpenAI chat-completions provider.

use super::{ChatModel, CompletionRequest, LlmError, MessagePart, PromptMessage, PromptRole};
use crate::observability::TracedClientExt;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Model families that reject any temperature other than the default.
const FIXED_TEMPERATURE_PREFIXES: &[&str] = &["gpt-5", "o1", "o3", "o4"];

/// Whether `model` accepts a caller-chosen sampling temperature.
pub fn supports_temperature(model: &str) -> bool {
    !FIXED_TEMPERATURE_PREFIXES
        .iter()
        .any(|prefix| model.starts_with(prefix))
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

pub struct OpenAiChatModel {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::NotConfigured(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    #[tracing::instrument(skip(self, request), fields(model = %self.config.model, message_count = request.messages.len()))]
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        if self.config.api_key.is_empty() {
            return Err(LlmError::NotConfigured(
                "OpenAI API key not configured".to_string(),
            ));
        }

        let body = ChatCompletionRequest::new(&self.config.model, request);

        let response = self
            .client
            .traced_post(&self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(LlmError::RateLimited);
            }

            return Err(LlmError::Api(format!(
                "OpenAI API error {}: {}",
                status, error_text
            )));
        }

        let api_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Api(format!("Failed to parse response: {}", e)))?;

        let text = api_response.into_text()?;

        tracing::debug!(reply_len = text.len(), "Received completion");

        Ok(text)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// OpenAI API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl<'a> ChatCompletionRequest<'a> {
    fn new(model: &'a str, request: &CompletionRequest) -> Self {
        Self {
            model,
            messages: request.messages.iter().map(WireMessage::from).collect(),
            temperature: request.temperature.filter(|_| supports_temperature(model)),
        }
    }
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: PromptRole,
    content: WireContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Parts(Vec<WirePart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WirePart {
    Text { text: String },
    ImageUrl { image_url: WireImageUrl },
}

#[derive(Debug, Serialize)]
struct WireImageUrl {
    url: String,
}

impl From<&PromptMessage> for WireMessage {
    fn from(msg: &PromptMessage) -> Self {
        let text_only = msg.parts.iter().all(|p| matches!(p, MessagePart::Text(_)));

        let content = if text_only {
            WireContent::Text(msg.text_content())
        } else {
            WireContent::Parts(
                msg.parts
                    .iter()
                    .map(|p| match p {
                        MessagePart::Text(text) => WirePart::Text { text: text.clone() },
                        MessagePart::ImageUrl(url) => WirePart::ImageUrl {
                            image_url: WireImageUrl { url: url.clone() },
                        },
                    })
                    .collect(),
            )
        };

        Self {
            role: msg.role,
            content,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

impl ChatCompletionResponse {
    fn into_text(self) -> Result<String, LlmError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
