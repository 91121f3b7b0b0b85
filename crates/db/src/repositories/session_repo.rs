//! Repository for the `sessions` table.

use speakwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::session::{CreateSession, Session, UpdateSession};
use crate::models::status::{SessionStatus, StatusId};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, student_id, folder_id, session_number, title, description, \
    scheduled_date, scheduled_time, day_of_week, duration_minutes, status_id, is_paid, \
    therapist_notes, created_at, updated_at";

/// Provides CRUD and status operations for sessions.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a generated session.
    ///
    /// Idempotent on `(student_id, folder_id, session_number)`: writing the
    /// same number twice returns the existing row unchanged, so the batch
    /// writer can retry safely.
    pub async fn create_planned(
        pool: &PgPool,
        input: &CreateSession,
    ) -> Result<Session, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions
                (student_id, folder_id, session_number, title, description,
                 scheduled_date, scheduled_time, day_of_week, duration_minutes,
                 status_id, is_paid, therapist_notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                     COALESCE($10, 1), COALESCE($11, FALSE), $12)
             ON CONFLICT ON CONSTRAINT uq_sessions_student_folder_number
             DO UPDATE SET session_number = sessions.session_number
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.student_id)
            .bind(input.folder_id)
            .bind(input.session_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.scheduled_date)
            .bind(input.scheduled_time)
            .bind(input.day_of_week)
            .bind(input.duration_minutes)
            .bind(input.status_id)
            .bind(input.is_paid)
            .bind(&input.therapist_notes)
            .fetch_one(pool)
            .await
    }

    /// Insert a session imported from the legacy export.
    ///
    /// Returns `None` when `input.legacy_id` was already imported.
    pub async fn create_legacy(
        pool: &PgPool,
        input: &CreateSession,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "INSERT INTO sessions
                (student_id, folder_id, session_number, title, description,
                 scheduled_date, scheduled_time, day_of_week, duration_minutes,
                 status_id, is_paid, therapist_notes, legacy_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                     COALESCE($10, 1), COALESCE($11, FALSE), $12, $13)
             ON CONFLICT ON CONSTRAINT uq_sessions_legacy_id DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.student_id)
            .bind(input.folder_id)
            .bind(input.session_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.scheduled_date)
            .bind(input.scheduled_time)
            .bind(input.day_of_week)
            .bind(input.duration_minutes)
            .bind(input.status_id)
            .bind(input.is_paid)
            .bind(&input.therapist_notes)
            .bind(&input.legacy_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a session by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a folder's sessions ordered by stored number.
    pub async fn list_by_folder(
        pool: &PgPool,
        folder_id: DbId,
    ) -> Result<Vec<Session>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions
             WHERE folder_id = $1
             ORDER BY session_number ASC, created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(folder_id)
            .fetch_all(pool)
            .await
    }

    /// Stored session numbers already used in a folder.
    pub async fn numbers_in_folder(pool: &PgPool, folder_id: DbId) -> Result<Vec<i32>, sqlx::Error> {
        sqlx::query_scalar("SELECT session_number FROM sessions WHERE folder_id = $1")
            .bind(folder_id)
            .fetch_all(pool)
            .await
    }

    /// Legacy document IDs already imported anywhere.
    pub async fn imported_legacy_ids(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT legacy_id FROM sessions WHERE legacy_id IS NOT NULL")
            .fetch_all(pool)
            .await
    }

    /// Update editable fields. Only non-`None` fields in `input` are applied.
    ///
    /// A new `scheduled_date` also resets `day_of_week` to that date's weekday.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSession,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                scheduled_date = COALESCE($4, scheduled_date),
                day_of_week = COALESCE(EXTRACT(DOW FROM $4::DATE)::SMALLINT, day_of_week),
                scheduled_time = COALESCE($5, scheduled_time),
                duration_minutes = COALESCE($6, duration_minutes),
                is_paid = COALESCE($7, is_paid),
                therapist_notes = COALESCE($8, therapist_notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.scheduled_date)
            .bind(input.scheduled_time)
            .bind(input.duration_minutes)
            .bind(input.is_paid)
            .bind(&input.therapist_notes)
            .fetch_optional(pool)
            .await
    }

    /// Move a session from `from` to `to`.
    ///
    /// Returns `None` if the session no longer has status `from`, which
    /// means a concurrent request changed it first.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        from: StatusId,
        to: StatusId,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET status_id = $3
             WHERE id = $1 AND status_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(from)
            .bind(to)
            .fetch_optional(pool)
            .await
    }

    /// Set the paid flag.
    pub async fn set_paid(
        pool: &PgPool,
        id: DbId,
        is_paid: bool,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!("UPDATE sessions SET is_paid = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .bind(is_paid)
            .fetch_optional(pool)
            .await
    }

    /// Make the lowest-numbered locked session after `after_number` available.
    ///
    /// Returns the unlocked session, or `None` if there is nothing to unlock.
    pub async fn unlock_next(
        pool: &PgPool,
        folder_id: DbId,
        after_number: i32,
    ) -> Result<Option<Session>, sqlx::Error> {
        let query = format!(
            "UPDATE sessions SET status_id = $4
             WHERE id = (
                SELECT id FROM sessions
                WHERE folder_id = $1 AND session_number > $2 AND status_id = $3
                ORDER BY session_number ASC
                LIMIT 1
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(folder_id)
            .bind(after_number)
            .bind(SessionStatus::Locked.id())
            .bind(SessionStatus::Available.id())
            .fetch_optional(pool)
            .await
    }

    /// Completed sessions across all of a student's folders.
    pub async fn count_completed_by_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE student_id = $1 AND status_id = $2")
            .bind(student_id)
            .bind(SessionStatus::Completed.id())
            .fetch_one(pool)
            .await
    }

    /// Delete a session. Remaining sessions keep their numbers.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
