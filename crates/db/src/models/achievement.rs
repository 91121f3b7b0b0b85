//! Achievement (trophy) model.

use serde::Serialize;
use speakwell_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `achievements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Achievement {
    pub id: DbId,
    pub student_id: DbId,
    pub code: String,
    pub title: String,
    pub awarded_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
