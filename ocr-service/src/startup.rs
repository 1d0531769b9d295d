use crate::config::OcrConfig;
use crate::handlers;
use crate::services::{
    ClovaConfig, ClovaOcrProvider, FieldRecognizer, TesseractConfig, TesseractProvider,
    TextRecognizer,
};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::with_common_layers;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

#[derive(Clone)]
pub struct AppState {
    pub config: OcrConfig,
    pub text_recognizer: Arc<dyn TextRecognizer>,
    /// `None` until both CLOVA settings are present.
    pub field_recognizer: Option<Arc<dyn FieldRecognizer>>,
}

impl AppState {
    pub fn from_config(config: &OcrConfig) -> Result<Self, AppError> {
        let timeout = Duration::from_secs(config.timeout_secs);

        let text_recognizer: Arc<dyn TextRecognizer> =
            Arc::new(TesseractProvider::new(TesseractConfig {
                binary: config.tesseract.binary.clone(),
                lang: config.tesseract.lang.clone(),
                timeout,
            }));

        let field_recognizer: Option<Arc<dyn FieldRecognizer>> =
            match (&config.clova.apigw_url, &config.clova.secret_key) {
                (Some(url), Some(secret)) => {
                    let provider = ClovaOcrProvider::new(ClovaConfig {
                        invoke_url: url.clone(),
                        secret_key: secret.clone(),
                        timeout,
                    })
                    .map_err(|e| AppError::ConfigError(anyhow::anyhow!(e)))?;
                    tracing::info!("CLOVA OCR provider initialized");
                    Some(Arc::new(provider) as Arc<dyn FieldRecognizer>)
                }
                _ => {
                    tracing::warn!(
                        "NAVER_OCR_APIGW_URL or NAVER_OCR_SECRET_KEY not set, /ocr/nutrition is disabled"
                    );
                    None
                }
            };

        Ok(Self {
            config: config.clone(),
            text_recognizer,
            field_recognizer,
        })
    }
}

pub fn router(state: AppState) -> Router {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics))
        .route("/ocr", post(handlers::perform_ocr))
        .route("/ocr/nutrition", post(handlers::ocr_nutrition))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    with_common_layers(router).with_state(state)
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    pub async fn build(config: OcrConfig) -> Result<Self, AppError> {
        let state = AppState::from_config(&config)?;
        Self::build_with_state(state).await
    }

    /// Build around a prepared state; tests inject mock providers here.
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let app = router(state);

        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("OCR service listening on {}", port);

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
