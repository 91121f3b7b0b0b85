//! Handlers for admin/parent messages.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use speakwell_core::error::CoreError;
use speakwell_core::messages::{normalize_body, validate_sender};
use speakwell_core::types::DbId;
use speakwell_db::models::message::{CreateMessage, Message};
use speakwell_db::repositories::MessageRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::student::ensure_student_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/students/{student_id}/messages
pub async fn create(
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
    Json(input): Json<CreateMessage>,
) -> AppResult<(StatusCode, Json<DataResponse<Message>>)> {
    validate_sender(&input.sender)?;
    let input = CreateMessage {
        body: normalize_body(&input.body)?,
        sender: input.sender,
    };

    ensure_student_exists(&state.pool, student_id).await?;
    let message = MessageRepo::create(&state.pool, student_id, &input).await?;
    tracing::info!(message_id = message.id, student_id, sender = %message.sender, "Message posted");
    Ok((StatusCode::CREATED, Json(DataResponse { data: message })))
}

/// GET /api/v1/students/{student_id}/messages
pub async fn list_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Message>>>> {
    ensure_student_exists(&state.pool, student_id).await?;
    let messages = MessageRepo::list_by_student(&state.pool, student_id).await?;
    Ok(Json(DataResponse { data: messages }))
}

/// POST /api/v1/messages/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Message>>> {
    let message = MessageRepo::mark_read(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id,
        }))?;
    Ok(Json(DataResponse { data: message }))
}

/// DELETE /api/v1/messages/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if MessageRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Message",
            id,
        }))
    }
}
