use serde::Deserialize;
use service_core::config::{self as core_config, get_env, get_optional_env, get_parsed_env};
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct FoodConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub database: DatabaseConfig,
    pub otlp_endpoint: Option<String>,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Absent means the built-in sample catalogue is served.
    pub url: Option<String>,
    pub max_connections: u32,
}

impl FoodConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = core_config::is_prod();

        let url = get_optional_env("DATABASE_URL");
        if is_prod && url.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "DATABASE_URL is required in production but not set"
            )));
        }

        Ok(FoodConfig {
            common,
            database: DatabaseConfig {
                url,
                max_connections: get_parsed_env("DATABASE_MAX_CONNECTIONS", 5),
            },
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
        })
    }
}
