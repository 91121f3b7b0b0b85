//! Handlers for individual sessions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use speakwell_core::error::CoreError;
use speakwell_core::folder_schedule::MAX_DURATION_MINUTES;
use speakwell_core::session_status;
use speakwell_core::types::DbId;
use speakwell_db::models::session::{Session, UpdateSession};
use speakwell_db::repositories::SessionRepo;
use sqlx::PgPool;

use crate::engine::progress::{apply_status_change, StatusChangeOutcome};
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `POST /sessions/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct ChangeStatus {
    /// `locked`, `available`, `completed` or `cancelled`.
    pub status: String,
}

/// Body for `POST /sessions/{id}/paid`.
#[derive(Debug, Deserialize)]
pub struct SetPaid {
    pub is_paid: bool,
}

pub(crate) async fn ensure_session_exists(pool: &PgPool, id: DbId) -> AppResult<Session> {
    SessionRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }))
}

/// GET /api/v1/sessions/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Session>>> {
    let session = ensure_session_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: session }))
}

/// PUT /api/v1/sessions/{id}
///
/// Edits descriptive fields only; status goes through the status endpoint.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSession>,
) -> AppResult<Json<DataResponse<Session>>> {
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Session title must not be empty".into(),
        )));
    }
    if let Some(minutes) = input.duration_minutes {
        if !(1..=MAX_DURATION_MINUTES).contains(&minutes) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "duration_minutes must be between 1 and {MAX_DURATION_MINUTES}, got {minutes}"
            ))));
        }
    }

    let session = SessionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }))?;
    Ok(Json(DataResponse { data: session }))
}

/// DELETE /api/v1/sessions/{id}
///
/// Remaining sessions keep their numbers and the folder counts are left
/// as they are until `POST /folders/{id}/reconcile` is called.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if SessionRepo::delete(&state.pool, id).await? {
        tracing::info!(session_id = id, "Session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }))
    }
}

/// POST /api/v1/sessions/{id}/status
///
/// Applies a status-machine transition, then unlocks the next session,
/// reconciles the folder and evaluates achievements as appropriate.
pub async fn change_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeStatus>,
) -> AppResult<Json<DataResponse<StatusChangeOutcome>>> {
    let to = session_status::from_name(&input.status).ok_or_else(|| {
        AppError::BadRequest(format!("Unknown session status '{}'", input.status))
    })?;

    let session = ensure_session_exists(&state.pool, id).await?;
    session_status::validate_transition(session.status_id, to)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let updated = SessionRepo::set_status(&state.pool, id, session.status_id, to)
        .await?
        .ok_or(AppError::Core(CoreError::Conflict(format!(
            "Session {id} status changed concurrently; reload and retry"
        ))))?;

    tracing::info!(
        session_id = id,
        from = session_status::status_name(session.status_id),
        to = session_status::status_name(to),
        "Session status changed",
    );

    let outcome = apply_status_change(&state.pool, updated).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/sessions/{id}/paid
pub async fn set_paid(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetPaid>,
) -> AppResult<Json<DataResponse<Session>>> {
    let session = SessionRepo::set_paid(&state.pool, id, input.is_paid)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Session",
            id,
        }))?;
    Ok(Json(DataResponse { data: session }))
}
