//! Handlers for student achievements.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use speakwell_core::achievements::{Milestone, FOLDER_COMPLETE_MILESTONE, SESSION_MILESTONES};
use speakwell_core::types::DbId;
use speakwell_db::models::achievement::Achievement;
use speakwell_db::repositories::{AchievementRepo, MessageRepo};

use crate::engine::progress::evaluate_achievements;
use crate::error::AppResult;
use crate::handlers::student::ensure_student_exists;
use crate::response::DataResponse;
use crate::state::AppState;

/// A student's trophies plus the unread message badge shown beside them.
#[derive(Debug, Serialize)]
pub struct StudentProgress {
    pub achievements: Vec<Achievement>,
    pub unread_from_admin: i64,
}

/// GET /api/v1/achievements/catalog
pub async fn catalog() -> Json<DataResponse<Vec<Milestone>>> {
    let milestones = SESSION_MILESTONES
        .iter()
        .copied()
        .chain(std::iter::once(FOLDER_COMPLETE_MILESTONE))
        .collect();
    Json(DataResponse { data: milestones })
}

/// GET /api/v1/students/{student_id}/achievements
pub async fn list_by_student(
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
) -> AppResult<Json<DataResponse<StudentProgress>>> {
    ensure_student_exists(&state.pool, student_id).await?;
    let achievements = AchievementRepo::list_by_student(&state.pool, student_id).await?;
    let unread_from_admin =
        MessageRepo::count_unread(&state.pool, student_id, speakwell_core::messages::SENDER_ADMIN)
            .await?;
    Ok(Json(DataResponse {
        data: StudentProgress {
            achievements,
            unread_from_admin,
        },
    }))
}

/// POST /api/v1/students/{student_id}/achievements/evaluate
///
/// Re-evaluates milestones, e.g. after imported sessions. Returns the
/// newly awarded achievements only.
pub async fn evaluate(
    State(state): State<AppState>,
    Path(student_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Achievement>>>> {
    ensure_student_exists(&state.pool, student_id).await?;
    let awarded = evaluate_achievements(&state.pool, student_id).await?;
    Ok(Json(DataResponse { data: awarded }))
}
