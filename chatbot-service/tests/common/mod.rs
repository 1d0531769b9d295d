#![allow(dead_code)]

use chatbot_service::config::{ChatbotConfig, ModelConfig, OpenAiSettings, SessionConfig};
use chatbot_service::services::SessionStore;
use chatbot_service::startup::{AppState, Application};
use service_core::config::Config as CoreConfig;
use service_core::llm::{ChatModel, MockChatModel};
use std::sync::Arc;

/// 1x1 transparent PNG.
pub const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

pub fn test_config() -> ChatbotConfig {
    ChatbotConfig {
        common: CoreConfig { port: 0 },
        openai: OpenAiSettings {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
        },
        models: ModelConfig {
            text_model: "mock-text".to_string(),
            vision_model: "mock-vision".to_string(),
            temperature: 0.7,
        },
        sessions: SessionConfig {
            idle_ttl_secs: None,
            max_sessions: None,
            sweep_interval_secs: 60,
        },
        max_upload_bytes: 20 * 1024 * 1024,
        otlp_endpoint: None,
        log_level: "info".to_string(),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub store: SessionStore,
    pub text_model: Arc<MockChatModel>,
    pub vision_model: Arc<MockChatModel>,
}

impl TestApp {
    /// Spawn with echoing text and vision models.
    pub async fn spawn() -> Self {
        Self::spawn_with(
            Arc::new(MockChatModel::echo("mock-text")),
            Arc::new(MockChatModel::replying("mock-vision", "사진 속 음식은 미역국입니다.")),
        )
        .await
    }

    pub async fn spawn_with(text_model: Arc<MockChatModel>, vision_model: Arc<MockChatModel>) -> Self {
        let state = AppState::with_models(
            test_config(),
            text_model.clone() as Arc<dyn ChatModel>,
            vision_model.clone() as Arc<dyn ChatModel>,
        );

        let app = Application::build_with_state(state)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let store = app.store().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            store,
            text_model,
            vision_model,
        }
    }
}
