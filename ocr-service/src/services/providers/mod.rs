//! OCR providers.
//!
//! Two kinds are used: a plain-text engine (Tesseract CLI) for `/ocr`, and a
//! structured-field service (CLOVA OCR) whose fields are joined back into
//! page text for nutrition parsing.

pub mod clova;
pub mod mock;
pub mod tesseract;

use async_trait::async_trait;
use thiserror::Error;

pub use clova::{ClovaConfig, ClovaOcrProvider};
pub use mock::{MockFieldRecognizer, MockTextRecognizer};
pub use tesseract::{TesseractConfig, TesseractProvider};

#[derive(Debug, Error)]
pub enum OcrError {
    #[error("{0}")]
    NotConfigured(String),

    /// Transport failure or non-success status from the OCR API.
    #[error("{0}")]
    Request(String),

    #[error("invalid OCR response: {0}")]
    InvalidResponse(String),

    #[error("{0}")]
    Engine(String),

    #[error("OCR timed out after {0} seconds")]
    Timeout(u64),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An uploaded image as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

impl UploadedImage {
    /// Subtype of the MIME type, e.g. `png` for `image/png`.
    pub fn format(&self) -> &str {
        self.content_type
            .rsplit('/')
            .next()
            .unwrap_or(self.content_type.as_str())
    }
}

/// One recognised text span.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrField {
    pub text: String,
    pub confidence: Option<f32>,
}

/// Join fields in provider order, each followed by a space.
pub fn assemble_text(fields: &[OcrField]) -> String {
    let mut text = String::new();
    for field in fields {
        text.push_str(&field.text);
        text.push(' ');
    }
    text
}

/// Plain text recognition.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize_text(&self, image: &UploadedImage) -> Result<String, OcrError>;

    fn provider_name(&self) -> &'static str;
}

/// Recognition returning individual text fields.
#[async_trait]
pub trait FieldRecognizer: Send + Sync {
    async fn recognize_fields(&self, image: &UploadedImage) -> Result<Vec<OcrField>, OcrError>;

    fn provider_name(&self) -> &'static str;
}
