//! Repository for the `session_materials` table.

use speakwell_core::types::DbId;
use sqlx::PgPool;

use crate::models::material::{CreateSessionMaterial, SessionMaterial};

const COLUMNS: &str =
    "id, session_id, file_name, content_type, size_bytes, sha256, storage_key, created_at, updated_at";

/// Metadata for uploaded session files.
pub struct SessionMaterialRepo;

impl SessionMaterialRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateSessionMaterial,
    ) -> Result<SessionMaterial, sqlx::Error> {
        let query = format!(
            "INSERT INTO session_materials
                (session_id, file_name, content_type, size_bytes, sha256, storage_key)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SessionMaterial>(&query)
            .bind(input.session_id)
            .bind(&input.file_name)
            .bind(&input.content_type)
            .bind(input.size_bytes)
            .bind(&input.sha256)
            .bind(&input.storage_key)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SessionMaterial>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM session_materials WHERE id = $1");
        sqlx::query_as::<_, SessionMaterial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a session's materials, oldest first.
    pub async fn list_by_session(
        pool: &PgPool,
        session_id: DbId,
    ) -> Result<Vec<SessionMaterial>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM session_materials
             WHERE session_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, SessionMaterial>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a material row, returning it so the caller can remove the object.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<SessionMaterial>, sqlx::Error> {
        let query = format!("DELETE FROM session_materials WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, SessionMaterial>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
