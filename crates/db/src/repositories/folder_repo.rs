//! Repository for the `session_folders` table.

use speakwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::folder::{
    CreateSessionFolder, FolderActivityRow, SessionFolder, UpdateSessionFolder,
};
use crate::models::status::SessionStatus;

/// Column list shared across queries. `is_active` is derived from the
/// owning student's `active_folder_id`.
const COLUMNS: &str = "f.id, f.student_id, f.name, f.description, f.status_id, \
    COALESCE(s.active_folder_id = f.id, FALSE) AS is_active, \
    f.total_sessions, f.completed_sessions, f.start_date, f.end_date, \
    f.created_at, f.updated_at";

/// Join needed by [`COLUMNS`].
const FROM: &str = "session_folders f JOIN students s ON s.id = f.student_id";

/// Provides CRUD, activation and stats reconciliation for folders.
pub struct SessionFolderRepo;

impl SessionFolderRepo {
    /// Insert a folder and, when appropriate, make it the student's active folder.
    ///
    /// The folder becomes active if `activate` is true or if the student had
    /// no folders before. The student row is locked for the duration of the
    /// transaction so concurrent creations see each other's folders.
    ///
    /// Returns `RowNotFound` if the student does not exist.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSessionFolder,
        activate: bool,
    ) -> Result<SessionFolder, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query_scalar::<_, DbId>("SELECT id FROM students WHERE id = $1 FOR UPDATE")
            .bind(input.student_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let had_folders: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM session_folders WHERE student_id = $1)",
        )
        .bind(input.student_id)
        .fetch_one(&mut *tx)
        .await?;

        let id: DbId = sqlx::query_scalar(
            "INSERT INTO session_folders
                (student_id, name, description, status_id, start_date, end_date)
             VALUES ($1, $2, $3, COALESCE($4, 1), $5, $6)
             RETURNING id",
        )
        .bind(input.student_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.status_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .fetch_one(&mut *tx)
        .await?;

        if activate || !had_folders {
            sqlx::query("UPDATE students SET active_folder_id = $2 WHERE id = $1")
                .bind(input.student_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Insert a folder imported from the legacy export, without activating it.
    ///
    /// Returns the existing row and `false` when `legacy_id` was already imported.
    pub async fn upsert_legacy(
        pool: &PgPool,
        legacy_id: &str,
        input: &CreateSessionFolder,
    ) -> Result<(SessionFolder, bool), sqlx::Error> {
        let inserted: Option<DbId> = sqlx::query_scalar(
            "INSERT INTO session_folders
                (student_id, name, description, status_id, start_date, end_date, legacy_id)
             VALUES ($1, $2, $3, COALESCE($4, 1), $5, $6, $7)
             ON CONFLICT ON CONSTRAINT uq_session_folders_legacy_id DO NOTHING
             RETURNING id",
        )
        .bind(input.student_id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.status_id)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(legacy_id)
        .fetch_optional(pool)
        .await?;

        match inserted {
            Some(id) => {
                let folder = Self::find_by_id(pool, id)
                    .await?
                    .ok_or(sqlx::Error::RowNotFound)?;
                Ok((folder, true))
            }
            None => {
                let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE f.legacy_id = $1");
                let existing = sqlx::query_as::<_, SessionFolder>(&query)
                    .bind(legacy_id)
                    .fetch_one(pool)
                    .await?;
                Ok((existing, false))
            }
        }
    }

    /// Find a folder by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SessionFolder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE f.id = $1");
        sqlx::query_as::<_, SessionFolder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a student's folders, most recently created first.
    pub async fn list_by_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<SessionFolder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM}
             WHERE f.student_id = $1
             ORDER BY f.created_at DESC, f.id DESC"
        );
        sqlx::query_as::<_, SessionFolder>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// IDs of every folder, oldest first.
    pub async fn list_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM session_folders ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }

    /// Activity projection of all folders, optionally scoped to one student.
    pub async fn list_activity(
        pool: &PgPool,
        student_id: Option<DbId>,
    ) -> Result<Vec<FolderActivityRow>, sqlx::Error> {
        sqlx::query_as::<_, FolderActivityRow>(
            "SELECT f.id, f.student_id,
                    COALESCE(s.active_folder_id = f.id, FALSE) AS is_active,
                    f.created_at
             FROM session_folders f JOIN students s ON s.id = f.student_id
             WHERE ($1::BIGINT IS NULL OR f.student_id = $1)
             ORDER BY f.student_id ASC, f.created_at ASC, f.id ASC",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }

    /// Update a folder. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSessionFolder,
    ) -> Result<Option<SessionFolder>, sqlx::Error> {
        let query = format!(
            "WITH updated AS (
                UPDATE session_folders SET
                    name = COALESCE($2, name),
                    description = COALESCE($3, description),
                    status_id = COALESCE($4, status_id),
                    start_date = COALESCE($5, start_date),
                    end_date = COALESCE($6, end_date)
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM updated f JOIN students s ON s.id = f.student_id"
        );
        sqlx::query_as::<_, SessionFolder>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.status_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .fetch_optional(pool)
            .await
    }

    /// Recompute `total_sessions` / `completed_sessions` from the folder's
    /// current session rows and write them back with a fresh `updated_at`.
    ///
    /// Returns `None` if the folder does not exist.
    pub async fn recompute_stats(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SessionFolder>, sqlx::Error> {
        let query = format!(
            "WITH counts AS (
                SELECT COUNT(*)::INT AS total,
                       COUNT(*) FILTER (WHERE status_id = $2)::INT AS completed
                FROM sessions
                WHERE folder_id = $1
             ),
             updated AS (
                UPDATE session_folders SET
                    total_sessions = counts.total,
                    completed_sessions = counts.completed,
                    updated_at = NOW()
                FROM counts
                WHERE session_folders.id = $1
                RETURNING session_folders.*
             )
             SELECT {COLUMNS} FROM updated f JOIN students s ON s.id = f.student_id"
        );
        sqlx::query_as::<_, SessionFolder>(&query)
            .bind(id)
            .bind(SessionStatus::Completed.id())
            .fetch_optional(pool)
            .await
    }

    /// `(total_sessions, completed_sessions)` of each of a student's folders,
    /// as currently cached.
    pub async fn stats_by_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<(i32, i32)>, sqlx::Error> {
        sqlx::query_as(
            "SELECT total_sessions, completed_sessions
             FROM session_folders WHERE student_id = $1",
        )
        .bind(student_id)
        .fetch_all(pool)
        .await
    }

    /// Number of session rows in a folder.
    pub async fn count_sessions(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE folder_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Delete a folder only if it has no sessions, in one statement.
    ///
    /// Returns `false` if the folder is missing or still holds sessions.
    pub async fn delete_if_empty(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM session_folders
             WHERE id = $1
               AND NOT EXISTS (SELECT 1 FROM sessions WHERE folder_id = $1)",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a folder together with its sessions in one transaction.
    ///
    /// Returns `None` if the folder does not exist, otherwise the number of
    /// sessions removed.
    pub async fn delete_cascade(pool: &PgPool, id: DbId) -> Result<Option<u64>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let sessions = sqlx::query("DELETE FROM sessions WHERE folder_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let folders = sqlx::query("DELETE FROM session_folders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if folders == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        tx.commit().await?;
        Ok(Some(sessions))
    }
}
