use crate::config::ChatbotConfig;
use crate::handlers;
use crate::models::ModelSettings;
use crate::services::{spawn_sweeper, ChatAssistant, SessionStore};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
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
    pub config: ChatbotConfig,
    pub store: SessionStore,
    pub assistant: ChatAssistant,
}

impl AppState {
    /// Wire the session store and the text/vision models from configuration.
    /// Without an API key both models fall back to the mock.
    pub fn from_config(config: &ChatbotConfig) -> Result<Self, AppError> {
        let text_model = build_model(config, &config.models.text_model)?;
        let vision_model = build_model(config, &config.models.vision_model)?;

        Ok(Self::with_models(config.clone(), text_model, vision_model))
    }

    pub fn with_models(
        config: ChatbotConfig,
        text_model: Arc<dyn ChatModel>,
        vision_model: Arc<dyn ChatModel>,
    ) -> Self {
        let defaults = ModelSettings {
            temperature: config.models.temperature,
            ..ModelSettings::default()
        };
        let store = SessionStore::new(defaults, config.sessions.retention());

        Self {
            config,
            store,
            assistant: ChatAssistant::new(text_model, vision_model),
        }
    }
}

fn build_model(config: &ChatbotConfig, model: &str) -> Result<Arc<dyn ChatModel>, AppError> {
    match &config.openai.api_key {
        Some(api_key) => {
            let provider = OpenAiChatModel::new(OpenAiConfig {
                api_key: api_key.clone(),
                base_url: config.openai.base_url.clone(),
                model: model.to_string(),
                timeout: Duration::from_secs(config.openai.timeout_secs),
            })
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
            tracing::info!(model = %model, "OpenAI chat model initialized");
            Ok(Arc::new(provider))
        }
        None => {
            tracing::warn!(model = %model, "OPENAI_API_KEY not set, using mock chat model");
            Ok(Arc::new(MockChatModel::echo(model)))
        }
    }
}

pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/chat", post(handlers::chat))
        .route("/chat/multimodal", post(handlers::chat_multimodal))
        .route("/chat/history/:session_id", get(handlers::get_history))
        .route("/chat/session/:session_id", delete(handlers::delete_session))
        .route("/chat/sessions", get(handlers::list_sessions))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    with_common_layers(router).with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: ChatbotConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(state).await
    }

    /// Build around a prepared state; tests use this to inject mock models.
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let retention = state.store.retention();
        if retention.is_enabled() {
            let interval = state.config.sessions.sweep_interval();
            tracing::info!(
                idle_ttl_secs = ?retention.idle_ttl.map(|d| d.as_secs()),
                max_sessions = ?retention.max_sessions,
                interval_secs = interval.as_secs(),
                "Session retention enabled"
            );
            spawn_sweeper(state.store.clone(), interval);
        }

        let app = router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Chatbot service listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn store(&self) -> &SessionStore {
        &self.state.store
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
