#![allow(dead_code)]

use photo_label_service::config::{BackendSettings, OpenAiSettings, PhotoLabelConfig};
use photo_label_service::services::{MockResultSink, ResultSink};
use photo_label_service::startup::{AppState, Application};
use service_core::config::Config as CoreConfig;
use service_core::llm::{ChatModel, MockChatModel};
use std::sync::Arc;

pub fn test_config() -> PhotoLabelConfig {
    PhotoLabelConfig {
        common: CoreConfig { port: 0 },
        openai: OpenAiSettings {
            api_key: None,
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 5,
        },
        model: "mock-vision".to_string(),
        temperature: 0.3,
        backend: BackendSettings {
            url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
        },
        otlp_endpoint: None,
        log_level: "info".to_string(),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub model: Arc<MockChatModel>,
    pub sink: Arc<MockResultSink>,
}

impl TestApp {
    /// Spawn with a model that recognises 김치찌개 and a recording sink.
    pub async fn spawn() -> Self {
        Self::spawn_with(
            Arc::new(MockChatModel::replying(
                "mock-vision",
                "음식명: 김치찌개\n신뢰도: 0.95",
            )),
            Arc::new(MockResultSink::new()),
        )
        .await
    }

    pub async fn spawn_with(model: Arc<MockChatModel>, sink: Arc<MockResultSink>) -> Self {
        let state = AppState::with_parts(
            test_config(),
            model.clone() as Arc<dyn ChatModel>,
            sink.clone() as Arc<dyn ResultSink>,
        );

        let app = Application::build_with_state(state)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

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
            model,
            sink,
        }
    }

    pub async fn post_label(&self, body: serde_json::Value) -> reqwest::Response {
        reqwest::Client::new()
            .post(format!("{}/v1/photo-label", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}
