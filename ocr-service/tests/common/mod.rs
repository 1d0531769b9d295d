#![allow(dead_code)]

use ocr_service::config::{ClovaSettings, OcrConfig, TesseractSettings};
use ocr_service::services::{FieldRecognizer, MockTextRecognizer, TextRecognizer};
use ocr_service::startup::{AppState, Application};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub fn test_config() -> OcrConfig {
    OcrConfig {
        common: CoreConfig { port: 0 },
        clova: ClovaSettings {
            apigw_url: None,
            secret_key: None,
        },
        tesseract: TesseractSettings {
            binary: "tesseract".to_string(),
            lang: "kor+eng".to_string(),
        },
        timeout_secs: 5,
        max_upload_bytes: 20 * 1024 * 1024,
        otlp_endpoint: None,
        log_level: "info".to_string(),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    pub async fn spawn(field_recognizer: Option<Arc<dyn FieldRecognizer>>) -> Self {
        Self::spawn_with(
            Arc::new(MockTextRecognizer::new("영양정보\n열량 200kcal\n")),
            field_recognizer,
        )
        .await
    }

    pub async fn spawn_with(
        text_recognizer: Arc<dyn TextRecognizer>,
        field_recognizer: Option<Arc<dyn FieldRecognizer>>,
    ) -> Self {
        let state = AppState {
            config: test_config(),
            text_recognizer,
            field_recognizer,
        };

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

        TestApp { address, port }
    }
}

pub fn label_part() -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(vec![0xFF, 0xD8, 0xFF, 0xE0])
        .file_name("label.jpg")
        .mime_str("image/jpeg")
        .expect("valid mime")
}
