//! Food recognition through a vision model.

use crate::services::metrics::LABEL_LATENCY;
use service_core::llm::{ChatModel, CompletionRequest, LlmError, PromptMessage};
use std::sync::Arc;

pub const LABEL_PROMPT: &str = "\
이 이미지에 있는 음식의 이름을 한국어로 정확하게 알려주세요.

응답 형식:
음식명: [음식 이름]
신뢰도: [0.0~1.0 사이의 숫자]

예시:
음식명: 김치찌개
신뢰도: 0.95";

pub const DEFAULT_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone, PartialEq)]
pub struct FoodLabel {
    pub label: String,
    pub confidence: f64,
}

/// Read `음식명:` and `신뢰도:` lines from a model reply.
///
/// The last matching line wins. An unreadable confidence falls back to
/// [`DEFAULT_CONFIDENCE`], and a reply without a name line becomes the label
/// as a whole.
pub fn parse_label_response(content: &str) -> FoodLabel {
    let content = content.trim();
    let mut label = String::new();
    let mut confidence = DEFAULT_CONFIDENCE;

    for line in content.lines() {
        let value = line.split_once(':').map(|(_, v)| v.trim());
        if line.contains("음식명:") || line.contains("음식명 :") {
            label = value.unwrap_or_default().to_string();
        } else if line.contains("신뢰도:") || line.contains("신뢰도 :") {
            confidence = value
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_CONFIDENCE);
        }
    }

    if label.is_empty() {
        label = content.to_string();
    }

    FoodLabel { label, confidence }
}

#[derive(Clone)]
pub struct PhotoLabeler {
    model: Arc<dyn ChatModel>,
    temperature: f32,
}

impl PhotoLabeler {
    pub fn new(model: Arc<dyn ChatModel>, temperature: f32) -> Self {
        Self { model, temperature }
    }

    #[tracing::instrument(skip(self), fields(model = %self.model.model_name()))]
    pub async fn analyze(&self, image_url: &str) -> Result<FoodLabel, LlmError> {
        let request = CompletionRequest {
            messages: vec![PromptMessage::user_with_image(LABEL_PROMPT, image_url)],
            temperature: Some(self.temperature),
        };

        let timer = LABEL_LATENCY.start_timer();
        let reply = self.model.complete(&request).await;
        timer.observe_duration();

        let label = parse_label_response(&reply?);
        tracing::info!(label = %label.label, confidence = label.confidence, "Photo labeled");
        Ok(label)
    }
}
