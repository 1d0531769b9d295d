use crate::dtos::{PhotoLabelRequest, PhotoLabelResponse};
use crate::services::metrics::{BACKEND_DELIVERIES_TOTAL, LABEL_REQUESTS_TOTAL};
use crate::startup::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use service_core::error::AppError;
use validator::Validate;

/// Label a meal photo and forward the result to the backend.
///
/// Delivery is best effort: a backend failure is logged and the caller still
/// receives the label.
#[tracing::instrument(skip(state, payload))]
pub async fn label_photo(
    State(state): State<AppState>,
    Json(payload): Json<PhotoLabelRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let label = state
        .labeler
        .analyze(&payload.image_url)
        .await
        .map_err(|e| {
            LABEL_REQUESTS_TOTAL.with_label_values(&["error"]).inc();
            tracing::error!(
                photo_analysis_id = payload.photo_analysis_id,
                error = %e,
                "Photo analysis failed"
            );
            AppError::ExternalService(format!("이미지 분석 중 오류 발생: {}", e))
        })?;

    match state.sink.deliver(payload.photo_analysis_id, &label).await {
        Ok(()) => {
            BACKEND_DELIVERIES_TOTAL.with_label_values(&["ok"]).inc();
        }
        Err(e) => {
            BACKEND_DELIVERIES_TOTAL.with_label_values(&["error"]).inc();
            tracing::warn!(
                photo_analysis_id = payload.photo_analysis_id,
                error = %e,
                "Failed to deliver label to backend"
            );
        }
    }

    LABEL_REQUESTS_TOTAL.with_label_values(&["ok"]).inc();

    Ok(Json(PhotoLabelResponse {
        success: true,
        photo_analysis_id: payload.photo_analysis_id,
        label: label.label,
        confidence: label.confidence,
    }))
}
