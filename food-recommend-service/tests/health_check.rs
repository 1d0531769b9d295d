mod common;

use async_trait::async_trait;
use common::TestApp;
use food_recommend_service::models::FoodRecord;
use food_recommend_service::services::FoodSource;
use reqwest::{Client, StatusCode};
use service_core::error::AppError;
use std::sync::Arc;

struct UnreachableSource;

#[async_trait]
impl FoodSource for UnreachableSource {
    async fn fetch_all(&self) -> Result<Vec<FoodRecord>, AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(AppError::DatabaseError(anyhow::anyhow!("connection refused")))
    }

    fn name(&self) -> &'static str {
        "unreachable"
    }
}

#[tokio::test]
async fn health_check_reports_source() {
    let app = TestApp::spawn().await;

    let response = Client::new()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["source"], "static");
}

#[tokio::test]
async fn unhealthy_source_reports_503() {
    let app = TestApp::spawn_with(Arc::new(UnreachableSource)).await;

    let response = Client::new()
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "unhealthy");
}

#[tokio::test]
async fn recommend_fails_with_500_when_source_is_down() {
    let app = TestApp::spawn_with(Arc::new(UnreachableSource)).await;

    let response = Client::new()
        .post(format!("{}/api/v1/recommend", app.address))
        .json(&serde_json::json!({
            "user": { "birthDate": "1994-05-01", "dueDate": "2025-12-01" }
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Database error");
}
