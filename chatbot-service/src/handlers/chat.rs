use crate::dtos::{ChatRequest, ChatResponse, MultimodalChatResponse};
use crate::models::Role;
use crate::services::image_info;
use crate::services::metrics::{ACTIVE_SESSIONS, CHAT_TURNS_TOTAL};
use crate::startup::AppState;
use axum::{
    extract::{Multipart, State},
    response::IntoResponse,
    Json,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use service_core::error::AppError;
use service_core::llm::LlmError;
use validator::Validate;

fn chat_failure(kind: &str, err: LlmError) -> AppError {
    CHAT_TURNS_TOTAL.with_label_values(&[kind, "error"]).inc();
    AppError::ExternalService(format!("채팅 처리 중 오류가 발생했습니다: {}", err))
}

#[tracing::instrument(skip(state, payload), fields(session_id))]
pub async fn chat(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let session_id = state.store.resolve(payload.session_id.as_deref());
    tracing::Span::current().record("session_id", session_id.as_str());

    if let Some(prompt) = &payload.system_prompt {
        state.store.update_system_prompt(&session_id, prompt.as_str());
    }

    let session = state
        .store
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("세션을 찾을 수 없습니다.")))?;

    state
        .store
        .append_message(&session_id, Role::User, payload.message.as_str());
    ACTIVE_SESSIONS.set(state.store.len() as i64);

    let reply = state
        .assistant
        .reply(&session.settings, &session.context, &payload.message)
        .await
        .map_err(|e| chat_failure("text", e))?;

    state
        .store
        .append_message(&session_id, Role::Assistant, reply.as_str());
    state
        .store
        .record_exchange(&session_id, &payload.message, &reply);
    CHAT_TURNS_TOTAL.with_label_values(&["text", "ok"]).inc();

    let message_history = state.store.history(&session_id).unwrap_or_default();

    tracing::info!(
        session_id = %session_id,
        message_count = message_history.len(),
        "Chat turn completed"
    );

    Ok(Json(ChatResponse {
        response: reply,
        session_id,
        message_history,
    }))
}

struct MultimodalForm {
    message: Option<String>,
    session_id: Option<String>,
    image: Option<Vec<u8>>,
}

async fn read_multimodal_form(mut multipart: Multipart) -> Result<MultimodalForm, AppError> {
    let mut form = MultimodalForm {
        message: None,
        session_id: None,
        image: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "message" => {
                form.message = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read message: {}", e))
                })?);
            }
            "session_id" => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read session_id: {}", e))
                })?;
                form.session_id = Some(value).filter(|v| !v.trim().is_empty());
            }
            "image" => {
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read image bytes: {}", e))
                })?;
                // An empty file input is sent as a zero-length part.
                if !bytes.is_empty() {
                    form.image = Some(bytes.to_vec());
                }
            }
            other => {
                tracing::debug!(field = %other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

#[tracing::instrument(skip(state, multipart), fields(session_id))]
pub async fn chat_multimodal(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let form = read_multimodal_form(multipart).await?;
    let message = form
        .message
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("message field is required")))?;

    let session_id = state.store.resolve(form.session_id.as_deref());
    tracing::Span::current().record("session_id", session_id.as_str());

    let session = state
        .store
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("세션을 찾을 수 없습니다.")))?;

    let image_processed = form.image.is_some();
    let mut stored_message = message.clone();
    let mut vision_input = None;

    if let Some(bytes) = &form.image {
        match image_info::probe(bytes) {
            Ok(info) => {
                tracing::info!(
                    format = %info.format_name(),
                    width = info.width,
                    height = info.height,
                    "Image attached to chat turn"
                );
                stored_message.push_str(&info.describe());
                vision_input = Some(format!(
                    "data:{};base64,{}",
                    info.mime_type(),
                    STANDARD.encode(bytes)
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Uploaded image could not be read");
                stored_message.push_str(&format!("\n이미지 처리 중 오류가 발생했습니다: {}", e));
            }
        }
    }

    state
        .store
        .append_message(&session_id, Role::User, stored_message.as_str());
    ACTIVE_SESSIONS.set(state.store.len() as i64);

    let reply = match &vision_input {
        Some(data_url) => state
            .assistant
            .reply_with_image(&session.settings, &message, data_url)
            .await
            .map_err(|e| chat_failure("multimodal", e))?,
        None => state
            .assistant
            .reply(&session.settings, &session.context, &stored_message)
            .await
            .map_err(|e| chat_failure("multimodal", e))?,
    };

    state
        .store
        .append_message(&session_id, Role::Assistant, reply.as_str());
    if vision_input.is_none() {
        state
            .store
            .record_exchange(&session_id, &stored_message, &reply);
    }
    CHAT_TURNS_TOTAL
        .with_label_values(&["multimodal", "ok"])
        .inc();

    let message_history = state.store.history(&session_id).unwrap_or_default();

    Ok(Json(MultimodalChatResponse {
        response: reply,
        session_id,
        message_history,
        image_processed,
    }))
}
