//! Session material (uploaded file) metadata.

use serde::Serialize;
use speakwell_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `session_materials` table. Bytes live in the object store.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionMaterial {
    pub id: DbId,
    pub session_id: DbId,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub sha256: String,
    pub storage_key: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording an uploaded material.
#[derive(Debug, Clone)]
pub struct CreateSessionMaterial {
    pub session_id: DbId,
    pub file_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub sha256: String,
    pub storage_key: String,
}
