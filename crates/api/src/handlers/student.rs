//! Handlers for the `/students` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use speakwell_core::error::CoreError;
use speakwell_core::types::DbId;
use speakwell_db::models::student::{CreateStudent, Student, UpdateStudent};
use speakwell_db::repositories::{SessionFolderRepo, StudentRepo};
use sqlx::PgPool;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for `PUT /students/{id}/active-folder`.
#[derive(Debug, Deserialize)]
pub struct SetActiveFolder {
    pub folder_id: DbId,
}

/// Load a student or fail with 404.
pub(crate) async fn ensure_student_exists(pool: &PgPool, id: DbId) -> AppResult<Student> {
    StudentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id,
        }))
}

// ---------------------------------------------------------------------------
// CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/students
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateStudent>,
) -> AppResult<(StatusCode, Json<DataResponse<Student>>)> {
    input.validate()?;
    let student = StudentRepo::create(&state.pool, &input).await?;
    tracing::info!(student_id = student.id, "Student created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: student })))
}

/// GET /api/v1/students
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Student>>>> {
    let students = StudentRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: students }))
}

/// GET /api/v1/students/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Student>>> {
    let student = ensure_student_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: student }))
}

/// PUT /api/v1/students/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStudent>,
) -> AppResult<Json<DataResponse<Student>>> {
    input.validate()?;
    let student = StudentRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id,
        }))?;
    Ok(Json(DataResponse { data: student }))
}

/// DELETE /api/v1/students/{id}
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    if StudentRepo::delete(&state.pool, id).await? {
        tracing::info!(student_id = id, "Student deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Student",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Active folder
// ---------------------------------------------------------------------------

/// PUT /api/v1/students/{id}/active-folder
///
/// Points the student at one of their own folders. A folder owned by
/// another student is rejected with 400.
pub async fn set_active_folder(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetActiveFolder>,
) -> AppResult<Json<DataResponse<Student>>> {
    ensure_student_exists(&state.pool, id).await?;

    let folder = SessionFolderRepo::find_by_id(&state.pool, input.folder_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SessionFolder",
            id: input.folder_id,
        }))?;

    if folder.student_id != id {
        return Err(AppError::BadRequest(format!(
            "Folder {} does not belong to student {id}",
            folder.id
        )));
    }

    if !StudentRepo::set_active_folder(&state.pool, id, folder.id).await? {
        // Folder or student vanished between the checks and the update.
        return Err(AppError::Core(CoreError::Conflict(
            "Folder is no longer available for activation".into(),
        )));
    }

    tracing::info!(student_id = id, folder_id = folder.id, "Active folder changed");
    let student = ensure_student_exists(&state.pool, id).await?;
    Ok(Json(DataResponse { data: student }))
}
