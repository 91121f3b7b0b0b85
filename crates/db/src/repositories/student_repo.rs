//! Repository for the `students` table.

use speakwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::student::{CreateStudent, Student, UpdateStudent};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, name, parent_name, parent_email, notes, active_folder_id, created_at, updated_at";

/// Provides CRUD operations for students and their active-folder pointer.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a new student, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStudent) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students (name, parent_name, parent_email, notes)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(&input.name)
            .bind(&input.parent_name)
            .bind(&input.parent_email)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Insert a student imported from the legacy export.
    ///
    /// Returns the existing row when `legacy_id` was already imported.
    pub async fn upsert_legacy(
        pool: &PgPool,
        legacy_id: &str,
        input: &CreateStudent,
    ) -> Result<(Student, bool), sqlx::Error> {
        let query = format!(
            "INSERT INTO students (name, parent_name, parent_email, notes, legacy_id)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_students_legacy_id DO NOTHING
             RETURNING {COLUMNS}"
        );
        let inserted = sqlx::query_as::<_, Student>(&query)
            .bind(&input.name)
            .bind(&input.parent_name)
            .bind(&input.parent_email)
            .bind(&input.notes)
            .bind(legacy_id)
            .fetch_optional(pool)
            .await?;

        match inserted {
            Some(student) => Ok((student, true)),
            None => {
                let query = format!("SELECT {COLUMNS} FROM students WHERE legacy_id = $1");
                let existing = sqlx::query_as::<_, Student>(&query)
                    .bind(legacy_id)
                    .fetch_one(pool)
                    .await?;
                Ok((existing, false))
            }
        }
    }

    /// Find a student by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all students ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Student>(&query).fetch_all(pool).await
    }

    /// Update a student. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateStudent,
    ) -> Result<Option<Student>, sqlx::Error> {
        let query = format!(
            "UPDATE students SET
                name = COALESCE($2, name),
                parent_name = COALESCE($3, parent_name),
                parent_email = COALESCE($4, parent_email),
                notes = COALESCE($5, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.parent_name)
            .bind(&input.parent_email)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    /// Delete a student and, through FK cascades, everything they own.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Point the student at `folder_id` as their active folder.
    ///
    /// Only succeeds when the folder belongs to the student. Returns `false`
    /// if the student does not exist or does not own the folder.
    pub async fn set_active_folder(
        pool: &PgPool,
        student_id: DbId,
        folder_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE students SET active_folder_id = $2
             WHERE id = $1
               AND EXISTS (
                   SELECT 1 FROM session_folders
                   WHERE id = $2 AND student_id = $1
               )",
        )
        .bind(student_id)
        .bind(folder_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Clear active-folder pointers that reference another student's folder.
    ///
    /// Scoped to one student when `student_id` is given. Returns the number
    /// of students whose pointer was cleared.
    pub async fn clear_foreign_active_folders(
        pool: &PgPool,
        student_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE students s SET active_folder_id = NULL
             WHERE s.active_folder_id IS NOT NULL
               AND ($1::BIGINT IS NULL OR s.id = $1)
               AND NOT EXISTS (
                   SELECT 1 FROM session_folders f
                   WHERE f.id = s.active_folder_id AND f.student_id = s.id
               )",
        )
        .bind(student_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
