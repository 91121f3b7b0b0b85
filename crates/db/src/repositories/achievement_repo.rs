//! Repository for the `achievements` table.

use speakwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::achievement::Achievement;

const COLUMNS: &str = "id, student_id, code, title, awarded_at, created_at, updated_at";

/// Trophies awarded to students.
pub struct AchievementRepo;

impl AchievementRepo {
    /// Award a trophy once per student and code.
    ///
    /// Returns `None` if the student already holds it.
    pub async fn award(
        pool: &PgPool,
        student_id: DbId,
        code: &str,
        title: &str,
    ) -> Result<Option<Achievement>, sqlx::Error> {
        let query = format!(
            "INSERT INTO achievements (student_id, code, title)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_achievements_student_code DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(student_id)
            .bind(code)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// A student's trophies in award order.
    pub async fn list_by_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<Achievement>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM achievements
             WHERE student_id = $1
             ORDER BY awarded_at ASC, id ASC"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }
}
