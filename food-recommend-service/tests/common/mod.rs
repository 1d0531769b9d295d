#![allow(dead_code)]

use food_recommend_service::config::{DatabaseConfig, FoodConfig};
use food_recommend_service::models::FoodRecord;
use food_recommend_service::services::{FoodSource, StaticFoodSource};
use food_recommend_service::startup::{AppState, Application};
use service_core::config::Config as CoreConfig;
use std::sync::Arc;

pub fn test_config() -> FoodConfig {
    FoodConfig {
        common: CoreConfig { port: 0 },
        database: DatabaseConfig {
            url: None,
            max_connections: 1,
        },
        otlp_endpoint: None,
        log_level: "info".to_string(),
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
}

impl TestApp {
    /// Spawn against the sample catalogue.
    pub async fn spawn() -> Self {
        Self::spawn_with(Arc::new(StaticFoodSource::sample())).await
    }

    pub async fn spawn_with_foods(foods: Vec<FoodRecord>) -> Self {
        Self::spawn_with(Arc::new(StaticFoodSource::new(foods))).await
    }

    pub async fn spawn_with(source: Arc<dyn FoodSource>) -> Self {
        let state = AppState {
            config: test_config(),
            source,
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
