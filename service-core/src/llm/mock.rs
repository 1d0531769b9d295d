//! Mock chat model for local runs without an API key and for tests.

use super::{ChatModel, CompletionRequest, LlmError, PromptRole};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

enum Behaviour {
    Echo,
    Reply(String),
    Fail(String),
}

pub struct MockChatModel {
    name: String,
    behaviour: Behaviour,
    call_count: AtomicU64,
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockChatModel {
    /// Replies with `Mock response for: <last user text>`.
    pub fn echo(name: impl Into<String>) -> Self {
        Self::with_behaviour(name, Behaviour::Echo)
    }

    /// Always replies with `reply`.
    pub fn replying(name: impl Into<String>, reply: impl Into<String>) -> Self {
        Self::with_behaviour(name, Behaviour::Reply(reply.into()))
    }

    /// Always fails with an API error carrying `message`.
    pub fn failing(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_behaviour(name, Behaviour::Fail(message.into()))
    }

    fn with_behaviour(name: impl Into<String>, behaviour: Behaviour) -> Self {
        Self {
            name: name.into(),
            behaviour,
            call_count: AtomicU64::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// The most recent request this model received.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request
            .lock()
            .ok()
            .and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_request.lock() {
            *guard = Some(request.clone());
        }

        match &self.behaviour {
            Behaviour::Echo => {
                let prompt = request
                    .messages
                    .iter()
                    .rev()
                    .find(|m| m.role == PromptRole::User)
                    .map(|m| m.text_content())
                    .unwrap_or_default();

                tracing::info!(model = %self.name, "[MOCK] completion");
                Ok(format!("Mock response for: {}", prompt))
            }
            Behaviour::Reply(reply) => Ok(reply.clone()),
            Behaviour::Fail(message) => Err(LlmError::Api(message.clone())),
        }
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}
