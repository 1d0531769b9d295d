//! Canned providers for local runs and tests.

use super::{FieldRecognizer, OcrError, OcrField, TextRecognizer, UploadedImage};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct MockTextRecognizer {
    text: Result<String, String>,
    calls: AtomicU64,
}

impl MockTextRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Ok(text.into()),
            calls: AtomicU64::new(0),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            text: Err(message.into()),
            calls: AtomicU64::new(0),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextRecognizer for MockTextRecognizer {
    async fn recognize_text(&self, _image: &UploadedImage) -> Result<String, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.text.clone().map_err(OcrError::Engine)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

pub struct MockFieldRecognizer {
    fields: Result<Vec<String>, String>,
    calls: AtomicU64,
}

impl MockFieldRecognizer {
    /// Returns one field per entry, in order.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: Ok(fields.into_iter().map(Into::into).collect()),
            calls: AtomicU64::new(0),
        }
    }

    /// Fails every call with a request error.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fields: Err(message.into()),
            calls: AtomicU64::new(0),
        }
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FieldRecognizer for MockFieldRecognizer {
    async fn recognize_fields(&self, _image: &UploadedImage) -> Result<Vec<OcrField>, OcrError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.fields {
            Ok(texts) => Ok(texts
                .iter()
                .map(|text| OcrField {
                    text: text.clone(),
                    confidence: Some(1.0),
                })
                .collect()),
            Err(message) => Err(OcrError::Request(message.clone())),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
