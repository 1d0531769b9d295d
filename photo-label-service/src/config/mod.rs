use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_optional_env, get_parsed_env};
use service_core::error::AppError;
use service_core::llm::openai::DEFAULT_OPENAI_BASE_URL;
use std::time::Duration;

pub const DEFAULT_BACKEND_URL: &str = "http://cloudbread-backend-svc.backend.svc.cluster.local";

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoLabelConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub openai: OpenAiSettings,
    pub model: String,
    pub temperature: f32,
    pub backend: BackendSettings,
    pub otlp_endpoint: Option<String>,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenAiSettings {
    /// Absent means the mock model is used.
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendSettings {
    pub url: String,
    pub timeout_secs: u64,
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl PhotoLabelConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = core_config::is_prod();

        let api_key = get_optional_env("OPENAI_API_KEY");
        if is_prod && api_key.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OPENAI_API_KEY is required in production but not set"
            )));
        }

        Ok(PhotoLabelConfig {
            common,
            openai: OpenAiSettings {
                api_key,
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL), false)?,
                timeout_secs: get_parsed_env("OPENAI_TIMEOUT_SECS", 120),
            },
            model: get_env("PHOTO_LABEL_MODEL", Some("gpt-4o"), false)?,
            temperature: get_parsed_env("PHOTO_LABEL_TEMPERATURE", 0.3),
            backend: BackendSettings {
                url: get_env("BACKEND_URL", Some(DEFAULT_BACKEND_URL), false)?,
                timeout_secs: get_parsed_env("BACKEND_TIMEOUT_SECS", 30),
            },
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
        })
    }
}
