//! Delivery of labeling results to the main backend.

use crate::services::labeler::FoodLabel;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use service_core::observability::TracedClientExt;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("backend request failed: {0}")]
    Request(String),

    #[error("backend returned {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Serialize)]
struct LabelPayload<'a> {
    label: &'a str,
    confidence: f64,
}

/// Where finished labels are sent.
#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn deliver(&self, photo_analysis_id: i64, label: &FoodLabel) -> Result<(), DeliveryError>;
}

#[derive(Clone)]
pub struct HttpResultSink {
    base_url: String,
    client: Client,
}

impl HttpResultSink {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DeliveryError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DeliveryError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn label_url(&self, photo_analysis_id: i64) -> String {
        format!(
            "{}/api/ai/photo-analyses/{}/label",
            self.base_url.trim_end_matches('/'),
            photo_analysis_id
        )
    }
}

#[async_trait]
impl ResultSink for HttpResultSink {
    #[tracing::instrument(skip(self, label))]
    async fn deliver(&self, photo_analysis_id: i64, label: &FoodLabel) -> Result<(), DeliveryError> {
        let response = self
            .client
            .traced_post(&self.label_url(photo_analysis_id))
            .json(&LabelPayload {
                label: &label.label,
                confidence: label.confidence,
            })
            .send()
            .await
            .map_err(|e| DeliveryError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Status { status, body });
        }

        tracing::info!("Label delivered to backend");
        Ok(())
    }
}

/// Records deliveries in memory, optionally failing each one.
#[derive(Default)]
pub struct MockResultSink {
    fail: bool,
    delivered: Mutex<Vec<(i64, FoodLabel)>>,
}

impl MockResultSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub fn delivered(&self) -> Vec<(i64, FoodLabel)> {
        self.delivered
            .lock()
            .map(|d| d.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ResultSink for MockResultSink {
    async fn deliver(&self, photo_analysis_id: i64, label: &FoodLabel) -> Result<(), DeliveryError> {
        if self.fail {
            return Err(DeliveryError::Request("connection refused".to_string()));
        }
        if let Ok(mut delivered) = self.delivered.lock() {
            delivered.push((photo_analysis_id, label.clone()));
        }
        Ok(())
    }
}
