//! Session folder (therapy program) model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use speakwell_core::active_folder::FolderActivity;
use speakwell_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `session_folders` table.
///
/// `is_active` is not stored on the folder; it is derived from
/// `students.active_folder_id` when the row is read.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionFolder {
    pub id: DbId,
    pub student_id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    pub is_active: bool,
    pub total_sessions: i32,
    pub completed_sessions: i32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a folder row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSessionFolder {
    pub student_id: DbId,
    pub name: String,
    pub description: Option<String>,
    /// Defaults to 1 (Active) if omitted.
    pub status_id: Option<StatusId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// DTO for updating a folder. Counts are not editable; use reconciliation.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSessionFolder {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Minimal folder projection used by the active-folder repair pass.
#[derive(Debug, Clone, FromRow)]
pub struct FolderActivityRow {
    pub id: DbId,
    pub student_id: DbId,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl From<FolderActivityRow> for FolderActivity {
    fn from(row: FolderActivityRow) -> Self {
        FolderActivity {
            folder_id: row.id,
            student_id: row.student_id,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}
