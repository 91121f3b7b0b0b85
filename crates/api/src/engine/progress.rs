//! Side effects of a session status change.
//!
//! Completing a session unlocks the next locked session in its folder and
//! may award achievements. Every status change reconciles the folder's
//! cached counts.

use serde::Serialize;
use speakwell_core::achievements;
use speakwell_core::folder_stats::FolderStats;
use speakwell_core::types::DbId;
use speakwell_db::models::achievement::Achievement;
use speakwell_db::models::folder::SessionFolder;
use speakwell_db::models::session::Session;
use speakwell_db::models::status::SessionStatus;
use speakwell_db::repositories::{AchievementRepo, SessionFolderRepo, SessionRepo};
use sqlx::PgPool;

/// Everything that changed as a result of one status transition.
#[derive(Debug, Serialize)]
pub struct StatusChangeOutcome {
    pub session: Session,
    /// The session made available by this completion, if any.
    pub unlocked: Option<Session>,
    /// The folder after reconciliation.
    pub folder: Option<SessionFolder>,
    /// Achievements newly awarded by this change.
    pub awarded: Vec<Achievement>,
}

/// Apply the effects of `session` having just moved to its current status.
pub async fn apply_status_change(
    pool: &PgPool,
    session: Session,
) -> Result<StatusChangeOutcome, sqlx::Error> {
    let completed = session.status_id == SessionStatus::Completed.id();

    let unlocked = if completed {
        SessionRepo::unlock_next(pool, session.folder_id, session.session_number).await?
    } else {
        None
    };
    if let Some(next) = &unlocked {
        tracing::info!(
            session_id = next.id,
            folder_id = next.folder_id,
            session_number = next.session_number,
            "Unlocked next session",
        );
    }

    let folder = SessionFolderRepo::recompute_stats(pool, session.folder_id).await?;

    let awarded = if completed {
        evaluate_achievements(pool, session.student_id).await?
    } else {
        Vec::new()
    };

    Ok(StatusChangeOutcome {
        session,
        unlocked,
        folder,
        awarded,
    })
}

/// Award every milestone the student has reached but does not hold yet.
pub async fn evaluate_achievements(
    pool: &PgPool,
    student_id: DbId,
) -> Result<Vec<Achievement>, sqlx::Error> {
    let completed_total = SessionRepo::count_completed_by_student(pool, student_id).await?;
    let folders: Vec<FolderStats> = SessionFolderRepo::stats_by_student(pool, student_id)
        .await?
        .into_iter()
        .map(|(total_sessions, completed_sessions)| FolderStats {
            total_sessions,
            completed_sessions,
        })
        .collect();

    let completed_total = i32::try_from(completed_total).unwrap_or(i32::MAX);

    let mut awarded = Vec::new();
    for milestone in achievements::earned(completed_total, &folders) {
        if let Some(row) =
            AchievementRepo::award(pool, student_id, milestone.code, milestone.title).await?
        {
            tracing::info!(student_id, code = milestone.code, "Achievement awarded");
            awarded.push(row);
        }
    }
    Ok(awarded)
}
