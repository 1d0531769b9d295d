use crate::models::DEFAULT_TEMPERATURE;
use crate::services::RetentionPolicy;
use serde::Deserialize;
use service_core::config::{
    self as core_config, get_env, get_optional_env, get_parsed_env, DEFAULT_MAX_UPLOAD_BYTES,
};
use service_core::error::AppError;
use service_core::llm::openai::DEFAULT_OPENAI_BASE_URL;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct ChatbotConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub openai: OpenAiSettings,
    pub models: ModelConfig,
    pub sessions: SessionConfig,
    pub max_upload_bytes: usize,
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
pub struct ModelConfig {
    pub text_model: String,
    pub vision_model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub idle_ttl_secs: Option<u64>,
    pub max_sessions: Option<usize>,
    pub sweep_interval_secs: u64,
}

impl SessionConfig {
    pub fn retention(&self) -> RetentionPolicy {
        RetentionPolicy {
            idle_ttl: self.idle_ttl_secs.map(Duration::from_secs),
            max_sessions: self.max_sessions,
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

impl ChatbotConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = core_config::is_prod();

        let api_key = get_optional_env("OPENAI_API_KEY");
        if is_prod && api_key.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OPENAI_API_KEY is required in production but not set"
            )));
        }

        Ok(ChatbotConfig {
            common,
            openai: OpenAiSettings {
                api_key,
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL), false)?,
                timeout_secs: get_parsed_env("OPENAI_TIMEOUT_SECS", 120),
            },
            models: ModelConfig {
                text_model: get_env("CHAT_TEXT_MODEL", Some("gpt-5-nano"), false)?,
                vision_model: get_env("CHAT_VISION_MODEL", Some("gpt-4o"), false)?,
                temperature: get_parsed_env("CHAT_TEMPERATURE", DEFAULT_TEMPERATURE),
            },
            sessions: SessionConfig {
                idle_ttl_secs: get_optional_env("CHAT_SESSION_IDLE_TTL_SECS")
                    .and_then(|v| v.trim().parse().ok()),
                max_sessions: get_optional_env("CHAT_MAX_SESSIONS")
                    .and_then(|v| v.trim().parse().ok()),
                sweep_interval_secs: get_parsed_env("CHAT_SESSION_SWEEP_INTERVAL_SECS", 60),
            },
            max_upload_bytes: get_parsed_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
        })
    }
}
