use serde::Deserialize;
use service_core::config::{
    self as core_config, get_env, get_optional_env, get_parsed_env, DEFAULT_MAX_UPLOAD_BYTES,
};
use service_core::error::AppError;

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub clova: ClovaSettings,
    pub tesseract: TesseractSettings,
    pub timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub otlp_endpoint: Option<String>,
    pub log_level: String,
}

/// Both values are needed for `/ocr/nutrition`; the endpoint reports a
/// configuration error otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct ClovaSettings {
    pub apigw_url: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TesseractSettings {
    pub binary: String,
    pub lang: String,
}

impl OcrConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;

        Ok(OcrConfig {
            common,
            clova: ClovaSettings {
                apigw_url: get_optional_env("NAVER_OCR_APIGW_URL"),
                secret_key: get_optional_env("NAVER_OCR_SECRET_KEY"),
            },
            tesseract: TesseractSettings {
                binary: get_env("TESSERACT_BIN", Some("tesseract"), false)?,
                lang: get_env("TESSERACT_LANG", Some("kor+eng"), false)?,
            },
            timeout_secs: get_parsed_env("OCR_TIMEOUT_SECS", 60),
            max_upload_bytes: get_parsed_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES),
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            log_level: get_env("LOG_LEVEL", Some("info"), false)?,
        })
    }
}
