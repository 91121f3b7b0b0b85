//! Handlers for session folders: creation with session generation,
//! reconciliation, deletion, and folder-scoped session listings.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use speakwell_core::batch::BatchReport;
use speakwell_core::error::CoreError;
use speakwell_core::folder_schedule::{
    plan_sessions, validate_folder_name, PlannedSession, ScheduleRequest, SlotTemplate,
};
use speakwell_core::numbering::{contiguous_view, RankedSession};
use speakwell_core::session_status::folder as folder_status;
use speakwell_core::types::DbId;
use speakwell_db::models::folder::{CreateSessionFolder, SessionFolder, UpdateSessionFolder};
use speakwell_db::models::session::Session;
use speakwell_db::repositories::{SessionFolderRepo, SessionRepo};
use sqlx::PgPool;

use crate::engine::generation::write_planned_sessions;
use crate::error::{AppError, AppResult};
use crate::handlers::student::ensure_student_exists;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body for `POST /folders`.
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub student_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub total_weeks: i32,
    pub sessions_per_week: i32,
    /// Exactly `sessions_per_week` weekly slots.
    pub slots: Vec<SlotTemplate>,
    /// Make the new folder active even if the student already has one.
    #[serde(default)]
    pub activate: bool,
    /// Defaults to `true`.
    pub first_session_available: Option<bool>,
    /// Defaults to today (UTC).
    pub start_date: Option<NaiveDate>,
}

/// Result of `POST /folders`: the reconciled folder and the write report.
#[derive(Debug, Serialize)]
pub struct CreateFolderResponse {
    pub folder: SessionFolder,
    pub sessions: BatchReport<PlannedSession>,
}

/// Query for `DELETE /folders/{id}`.
#[derive(Debug, Deserialize)]
pub struct DeleteFolderParams {
    #[serde(default)]
    pub cascade: bool,
}

async fn ensure_folder_exists(pool: &PgPool, id: DbId) -> AppResult<SessionFolder> {
    SessionFolderRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SessionFolder",
            id,
        }))
}

// ---------------------------------------------------------------------------
// Creation
// ---------------------------------------------------------------------------

/// POST /api/v1/folders
///
/// Validates the schedule, creates the folder, writes the generated
/// sessions sequentially and reconciles the folder counts. Sessions that
/// fail to write are listed in `sessions.failed`; the folder is kept.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateFolderRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreateFolderResponse>>)> {
    validate_folder_name(&input.name)?;

    let schedule = ScheduleRequest {
        total_weeks: input.total_weeks,
        sessions_per_week: input.sessions_per_week,
        slots: input.slots,
        start_date: input
            .start_date
            .unwrap_or_else(|| Utc::now().date_naive()),
        first_session_available: input.first_session_available.unwrap_or(true),
    };
    let planned = plan_sessions(&schedule)?;

    ensure_student_exists(&state.pool, input.student_id).await?;

    let folder = SessionFolderRepo::create(
        &state.pool,
        &CreateSessionFolder {
            student_id: input.student_id,
            name: input.name.trim().to_string(),
            description: input.description,
            status_id: Some(folder_status::ACTIVE),
            start_date: Some(schedule.start_date),
            end_date: planned.last().map(|s| s.scheduled_date),
        },
        input.activate,
    )
    .await?;

    tracing::info!(
        folder_id = folder.id,
        student_id = folder.student_id,
        planned = planned.len(),
        is_active = folder.is_active,
        "Folder created",
    );

    let report = write_planned_sessions(
        &state.pool,
        folder.student_id,
        folder.id,
        planned,
        state.config.session_write_delay(),
        state.config.session_retry_policy(),
    )
    .await;

    let folder = SessionFolderRepo::recompute_stats(&state.pool, folder.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SessionFolder",
            id: folder.id,
        }))?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreateFolderResponse {
                folder,
                sessions: report,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// Read / update
// ---------------------------------------------------------------------------

/// GET /api/v1/students/{student_id}/folders
pub async fn list_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<SessionFolder>>>> {
    ensure_student_exists(&state.pool, student_id).await?;
    let folders = SessionFolderRepo::list_by_student(&state.pool, student_id).await?;
    Ok(Json(DataResponse { data: folders }))
}

/// GET /api/v1/folders/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionFolder>>> {
    let folder = ensure_folder_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: folder }))
}

/// PUT /api/v1/folders/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSessionFolder>,
) -> AppResult<Json<DataResponse<SessionFolder>>> {
    if let Some(name) = &input.name {
        validate_folder_name(name)?;
    }
    if let Some(status_id) = input.status_id {
        if !folder_status::is_valid(status_id) {
            return Err(AppError::BadRequest(format!(
                "Unknown folder status id {status_id}"
            )));
        }
    }

    let folder = SessionFolderRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SessionFolder",
            id,
        }))?;
    Ok(Json(DataResponse { data: folder }))
}

/// POST /api/v1/folders/{id}/reconcile
///
/// Recompute the cached session counts from the folder's live sessions.
pub async fn reconcile(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SessionFolder>>> {
    let folder = SessionFolderRepo::recompute_stats(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SessionFolder",
            id,
        }))?;

    tracing::info!(
        folder_id = id,
        total = folder.total_sessions,
        completed = folder.completed_sessions,
        "Folder stats reconciled",
    );
    Ok(Json(DataResponse { data: folder }))
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

/// DELETE /api/v1/folders/{id}?cascade=true
///
/// Without `cascade`, a folder that still has sessions is a 409.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DeleteFolderParams>,
) -> AppResult<StatusCode> {
    if params.cascade {
        let removed = SessionFolderRepo::delete_cascade(&state.pool, id)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: "SessionFolder",
                id,
            }))?;
        tracing::info!(folder_id = id, sessions_removed = removed, "Folder deleted");
        return Ok(StatusCode::NO_CONTENT);
    }

    if SessionFolderRepo::delete_if_empty(&state.pool, id).await? {
        tracing::info!(folder_id = id, "Folder deleted");
        return Ok(StatusCode::NO_CONTENT);
    }

    ensure_folder_exists(&state.pool, id).await?;
    let sessions = SessionFolderRepo::count_sessions(&state.pool, id).await?;
    Err(AppError::Core(CoreError::Conflict(format!(
        "Folder {id} still has {sessions} sessions; pass cascade=true to delete them"
    ))))
}

// ---------------------------------------------------------------------------
// Folder sessions
// ---------------------------------------------------------------------------

/// GET /api/v1/folders/{id}/sessions
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Session>>>> {
    ensure_folder_exists(&state.pool, id).await?;
    let sessions = SessionRepo::list_by_folder(&state.pool, id).await?;
    Ok(Json(DataResponse { data: sessions }))
}

/// GET /api/v1/folders/{id}/sessions/renumbered
///
/// Gap-free positions for display. Stored numbers are not changed.
pub async fn renumbered_sessions(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RankedSession>>>> {
    ensure_folder_exists(&state.pool, id).await?;
    let sessions = SessionRepo::list_by_folder(&state.pool, id).await?;
    let keys: Vec<_> = sessions
        .iter()
        .map(|s| (s.id, s.session_number, s.created_at))
        .collect();
    Ok(Json(DataResponse {
        data: contiguous_view(&keys),
    }))
}
