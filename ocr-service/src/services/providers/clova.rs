//! Naver CLOVA OCR (general model, V2 API).

use super::{FieldRecognizer, OcrError, OcrField, UploadedImage};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use service_core::observability::TracedClientExt;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ClovaConfig {
    /// Full API gateway invoke URL.
    pub invoke_url: String,
    pub secret_key: String,
    pub timeout: Duration,
}

pub struct ClovaOcrProvider {
    config: ClovaConfig,
    client: Client,
}

impl ClovaOcrProvider {
    pub fn new(config: ClovaConfig) -> Result<Self, OcrError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| OcrError::NotConfigured(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OcrRequest<'a> {
    version: &'static str,
    request_id: String,
    timestamp: i64,
    lang: &'static str,
    images: Vec<OcrRequestImage<'a>>,
}

#[derive(Debug, Serialize)]
struct OcrRequestImage<'a> {
    format: &'a str,
    name: &'a str,
    data: String,
}

impl<'a> OcrRequest<'a> {
    fn new(image: &'a UploadedImage) -> Self {
        Self {
            version: "V2",
            request_id: Uuid::new_v4().to_string(),
            timestamp: 0,
            lang: "ko",
            images: vec![OcrRequestImage {
                format: image.format(),
                name: &image.filename,
                data: STANDARD.encode(&image.bytes),
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    images: Vec<OcrResponseImage>,
}

#[derive(Debug, Deserialize)]
struct OcrResponseImage {
    #[serde(default)]
    fields: Vec<OcrResponseField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OcrResponseField {
    #[serde(default)]
    infer_text: String,
    infer_confidence: Option<f32>,
}

impl OcrResponse {
    fn into_fields(self) -> Vec<OcrField> {
        self.images
            .into_iter()
            .flat_map(|image| image.fields)
            .map(|field| OcrField {
                text: field.infer_text,
                confidence: field.infer_confidence,
            })
            .collect()
    }
}

#[async_trait]
impl FieldRecognizer for ClovaOcrProvider {
    #[tracing::instrument(skip(self, image), fields(filename = %image.filename, size = image.bytes.len()))]
    async fn recognize_fields(&self, image: &UploadedImage) -> Result<Vec<OcrField>, OcrError> {
        let body = OcrRequest::new(image);

        let response = self
            .client
            .traced_post(&self.config.invoke_url)
            .header("X-OCR-SECRET", &self.config.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OcrError::Request(e.to_string()))?
            .error_for_status()
            .map_err(|e| OcrError::Request(e.to_string()))?;

        let parsed: OcrResponse = response
            .json()
            .await
            .map_err(|e| OcrError::InvalidResponse(e.to_string()))?;

        let fields = parsed.into_fields();
        tracing::info!(field_count = fields.len(), "CLOVA OCR completed");
        Ok(fields)
    }

    fn provider_name(&self) -> &'static str {
        "clova"
    }
}
