//! Prompt assembly for chat turns.

use crate::models::{ChatMessage, ModelSettings, Role};
use crate::services::metrics::{LLM_LATENCY, LLM_REQUESTS_TOTAL};
use service_core::llm::{ChatModel, CompletionRequest, LlmError, PromptMessage};
use std::sync::Arc;

/// Wraps the text and vision models used by the chat handlers.
#[derive(Clone)]
pub struct ChatAssistant {
    text_model: Arc<dyn ChatModel>,
    vision_model: Arc<dyn ChatModel>,
}

impl ChatAssistant {
    pub fn new(text_model: Arc<dyn ChatModel>, vision_model: Arc<dyn ChatModel>) -> Self {
        Self {
            text_model,
            vision_model,
        }
    }

    /// Continue a conversation: system prompt, prior turns, then `user_text`.
    pub async fn reply(
        &self,
        settings: &ModelSettings,
        history: &[ChatMessage],
        user_text: &str,
    ) -> Result<String, LlmError> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(PromptMessage::system(settings.system_prompt.clone()));
        messages.extend(history.iter().map(|m| match m.role {
            Role::User => PromptMessage::user(m.content.clone()),
            Role::Assistant => PromptMessage::assistant(m.content.clone()),
        }));
        messages.push(PromptMessage::user(user_text));

        let request = CompletionRequest {
            messages,
            temperature: Some(settings.temperature),
        };

        observe(self.text_model.as_ref(), &request).await
    }

    /// One-shot question about an image. Conversation history is not sent.
    pub async fn reply_with_image(
        &self,
        settings: &ModelSettings,
        user_text: &str,
        image_data_url: &str,
    ) -> Result<String, LlmError> {
        let request = CompletionRequest {
            messages: vec![PromptMessage::user_with_image(user_text, image_data_url)],
            temperature: Some(settings.temperature),
        };

        observe(self.vision_model.as_ref(), &request).await
    }
}

async fn observe(model: &dyn ChatModel, request: &CompletionRequest) -> Result<String, LlmError> {
    let timer = LLM_LATENCY
        .with_label_values(&[model.model_name()])
        .start_timer();
    let result = model.complete(request).await;
    timer.observe_duration();

    let status = if result.is_ok() { "ok" } else { "error" };
    LLM_REQUESTS_TOTAL
        .with_label_values(&[model.model_name(), status])
        .inc();

    if let Err(e) = &result {
        tracing::error!(model = %model.model_name(), error = %e, "Chat model call failed");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use service_core::llm::{MessagePart, MockChatModel, PromptRole};

    fn message(role: Role, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn reply_sends_system_history_and_new_message() {
        let text = Arc::new(MockChatModel::echo("text"));
        let vision = Arc::new(MockChatModel::echo("vision"));
        let assistant = ChatAssistant::new(text.clone(), vision.clone());

        let history = vec![
            message(Role::User, "철분제는 언제 먹나요?"),
            message(Role::Assistant, "공복에 드세요."),
        ];
        let reply = assistant
            .reply(&ModelSettings::default(), &history, "커피는요?")
            .await
            .unwrap();

        assert_eq!(reply, "Mock response for: 커피는요?");
        let sent = text.last_request().unwrap();
        let roles: Vec<PromptRole> = sent.messages.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                PromptRole::System,
                PromptRole::User,
                PromptRole::Assistant,
                PromptRole::User
            ]
        );
        assert_eq!(sent.temperature, Some(0.7));
        assert_eq!(vision.call_count(), 0);
    }

    #[tokio::test]
    async fn image_reply_uses_vision_model_without_history() {
        let text = Arc::new(MockChatModel::echo("text"));
        let vision = Arc::new(MockChatModel::replying("vision", "미역국으로 보입니다."));
        let assistant = ChatAssistant::new(text.clone(), vision.clone());

        let reply = assistant
            .reply_with_image(&ModelSettings::default(), "이건 뭐죠?", "data:image/png;base64,AA")
            .await
            .unwrap();

        assert_eq!(reply, "미역국으로 보입니다.");
        let sent = vision.last_request().unwrap();
        assert_eq!(sent.messages.len(), 1);
        assert_eq!(
            sent.messages[0].parts[1],
            MessagePart::ImageUrl("data:image/png;base64,AA".to_string())
        );
        assert_eq!(text.call_count(), 0);
    }
}
