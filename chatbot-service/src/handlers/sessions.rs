use crate::dtos::{HistoryResponse, MessageResponse, SessionListResponse};
use crate::services::metrics::ACTIVE_SESSIONS;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

fn session_not_found() -> AppError {
    AppError::NotFound(anyhow::anyhow!("세션을 찾을 수 없습니다."))
}

pub async fn get_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let session = state.store.get(&session_id).ok_or_else(session_not_found)?;

    Ok(Json(HistoryResponse {
        session_id: session.session_id,
        message_history: session.messages,
        created_at: session.created_at,
    }))
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store.delete(&session_id) {
        return Err(session_not_found());
    }
    ACTIVE_SESSIONS.set(state.store.len() as i64);

    Ok(Json(MessageResponse {
        message: format!("세션 {}가 삭제되었습니다.", session_id),
    }))
}

pub async fn list_sessions(State(state): State<AppState>) -> impl IntoResponse {
    Json(SessionListResponse {
        active_sessions: state.store.list(),
    })
}
