use crate::config::FoodConfig;
use crate::handlers;
use crate::services::{FoodSource, MySqlFoodSource, StaticFoodSource};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::with_common_layers;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub config: FoodConfig,
    pub source: Arc<dyn FoodSource>,
}

pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/api/v1/recommend", post(handlers::recommend));

    with_common_layers(router).with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: FoodConfig) -> Result<Self, AppError> {
        let source: Arc<dyn FoodSource> = match &config.database.url {
            Some(url) => Arc::new(
                MySqlFoodSource::connect(url, config.database.max_connections)
                    .await
                    .map_err(|e| {
                        tracing::error!("Failed to connect to MySQL: {}", e);
                        e
                    })?,
            ),
            None => {
                tracing::warn!("DATABASE_URL not set, serving the sample food catalogue");
                Arc::new(StaticFoodSource::sample())
            }
        };

        Self::build_with_state(AppState { config, source }).await
    }

    /// Build around a prepared state; tests inject a static catalogue here.
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let app = router(state);

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Food recommendation service listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
