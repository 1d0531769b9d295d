use crate::config::PhotoLabelConfig;
use crate::handlers;
use crate::services::{HttpResultSink, PhotoLabeler, ResultSink};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::llm::{ChatModel, MockChatModel, OpenAiChatModel, OpenAiConfig};
use service_core::middleware::with_common_layers;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub config: PhotoLabelConfig,
    pub labeler: PhotoLabeler,
    pub sink: Arc<dyn ResultSink>,
}

impl AppState {
    pub fn from_config(config: &PhotoLabelConfig) -> Result<Self, AppError> {
        let model: Arc<dyn ChatModel> = match &config.openai.api_key {
            Some(api_key) => {
                let provider = OpenAiChatModel::new(OpenAiConfig {
                    api_key: api_key.clone(),
                    base_url: config.openai.base_url.clone(),
                    model: config.model.clone(),
                    timeout: Duration::from_secs(config.openai.timeout_secs),
                })
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
                tracing::info!(model = %config.model, "OpenAI vision model initialized");
                Arc::new(provider)
            }
            None => {
                tracing::warn!("OPENAI_API_KEY not set, using mock vision model");
                Arc::new(MockChatModel::echo(config.model.clone()))
            }
        };

        let sink = HttpResultSink::new(config.backend.url.clone(), config.backend.timeout())
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;

        Ok(Self::with_parts(config.clone(), model, Arc::new(sink)))
    }

    pub fn with_parts(
        config: PhotoLabelConfig,
        model: Arc<dyn ChatModel>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        let labeler = PhotoLabeler::new(model, config.temperature);
        Self {
            config,
            labeler,
            sink,
        }
    }
}

pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/v1/photo-label", post(handlers::label_photo));

    with_common_layers(router).with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: PhotoLabelConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(state).await
    }

    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let app = router(state);

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Photo label service listening on {}", port);

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
