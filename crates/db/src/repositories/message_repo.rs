//! Repository for the `messages` table.

use speakwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{CreateMessage, Message};

const COLUMNS: &str = "id, student_id, sender, body, read_at, created_at, updated_at";

/// Admin/parent message thread per student.
pub struct MessageRepo;

impl MessageRepo {
    /// Insert a message. `input` must already be validated and trimmed.
    pub async fn create(
        pool: &PgPool,
        student_id: DbId,
        input: &CreateMessage,
    ) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (student_id, sender, body)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(student_id)
            .bind(&input.sender)
            .bind(&input.body)
            .fetch_one(pool)
            .await
    }

    /// A student's thread, oldest first.
    pub async fn list_by_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages
             WHERE student_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }

    /// Mark a message read. The first read time is kept.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<Option<Message>, sqlx::Error> {
        let query = format!(
            "UPDATE messages SET read_at = COALESCE(read_at, NOW())
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Unread messages in a student's thread from `sender`.
    pub async fn count_unread(
        pool: &PgPool,
        student_id: DbId,
        sender: &str,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM messages
             WHERE student_id = $1 AND sender = $2 AND read_at IS NULL",
        )
        .bind(student_id)
        .bind(sender)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
