mod common;

use common::{label_part, TestApp};
use ocr_service::services::init_metrics;
use reqwest::{multipart, Client};

#[tokio::test]
async fn health_check_works() {
    let app = TestApp::spawn(None).await;

    let response = Client::new()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["text_provider"], "mock");
    assert!(body["nutrition_provider"].is_null());
}

#[tokio::test]
async fn metrics_endpoint_lists_ocr_metrics() {
    init_metrics();
    let app = TestApp::spawn(None).await;
    let client = Client::new();

    // Labelled collectors only appear once a series has been recorded.
    let response = client
        .post(format!("{}/ocr", app.address))
        .multipart(multipart::Form::new().part("file", label_part()))
        .send()
        .await
        .expect("Failed to execute request");
    assert!(response.status().is_success());

    let body = client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request")
        .text()
        .await
        .unwrap();

    assert!(body.contains("ocr_requests_total"));
    assert!(body.contains("ocr_provider_latency_seconds"));
}
