use crate::services::metrics::{NUTRITION_FIELDS_FOUND, OCR_PROVIDER_LATENCY, OCR_REQUESTS_TOTAL};
use crate::services::{assemble_text, parse_nutrition_text, OcrError, UploadedImage};
use crate::startup::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use service_core::error::AppError;

pub const MISSING_OCR_CONFIG: &str = "OCR API environment variables are not set.";

/// Read the `file` part. Parts without a filename are form values, not files.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedImage, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        if filename.is_empty() {
            return Err(AppError::BadRequest(anyhow::anyhow!("No selected file")));
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e)))?
            .to_vec();

        return Ok(UploadedImage {
            bytes,
            filename,
            content_type,
        });
    }

    Err(AppError::BadRequest(anyhow::anyhow!("No file part")))
}

fn count(endpoint: &str, status: &str) {
    OCR_REQUESTS_TOTAL
        .with_label_values(&[endpoint, status])
        .inc();
}

#[tracing::instrument(skip(state, multipart))]
pub async fn perform_ocr(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let image = read_upload(multipart).await.inspect_err(|_| count("ocr", "rejected"))?;

    let timer = OCR_PROVIDER_LATENCY
        .with_label_values(&[state.text_recognizer.provider_name()])
        .start_timer();
    let result = state.text_recognizer.recognize_text(&image).await;
    timer.observe_duration();

    let text = result.map_err(|e| {
        count("ocr", "error");
        tracing::error!(error = %e, filename = %image.filename, "Text OCR failed");
        AppError::ExternalService(e.to_string())
    })?;

    count("ocr", "ok");
    tracing::info!(filename = %image.filename, chars = text.chars().count(), "Text OCR completed");

    Ok(Json(json!({ "text": text })))
}

#[tracing::instrument(skip(state, multipart))]
pub async fn ocr_nutrition(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let Some(recognizer) = state.field_recognizer.clone() else {
        count("nutrition", "error");
        return Err(AppError::ConfigError(anyhow::anyhow!(MISSING_OCR_CONFIG)));
    };

    let image = read_upload(multipart)
        .await
        .inspect_err(|_| count("nutrition", "rejected"))?;

    let timer = OCR_PROVIDER_LATENCY
        .with_label_values(&[recognizer.provider_name()])
        .start_timer();
    let result = recognizer.recognize_fields(&image).await;
    timer.observe_duration();

    let fields = result.map_err(|e| {
        count("nutrition", "error");
        tracing::error!(error = %e, filename = %image.filename, "Nutrition OCR failed");
        let message = match &e {
            OcrError::Request(_) => format!("API request failed: {}", e),
            _ => e.to_string(),
        };
        AppError::ExternalService(message)
    })?;

    let text = assemble_text(&fields);
    let facts = parse_nutrition_text(&text);

    NUTRITION_FIELDS_FOUND
        .with_label_values(&[recognizer.provider_name()])
        .observe(facts.field_count() as f64);
    count("nutrition", "ok");
    tracing::info!(
        filename = %image.filename,
        field_count = fields.len(),
        nutrients_found = facts.field_count(),
        "Nutrition label parsed"
    );

    Ok(Json(facts))
}
