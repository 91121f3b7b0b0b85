//! Admin/parent message model and DTOs.

use serde::{Deserialize, Serialize};
use speakwell_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `messages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub student_id: DbId,
    /// `"admin"` or `"parent"`.
    pub sender: String,
    pub body: String,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for posting a message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessage {
    pub sender: String,
    pub body: String,
}
