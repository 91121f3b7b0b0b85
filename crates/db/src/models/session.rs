//! Session entity model and DTOs.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use speakwell_core::types::{DbId, Timestamp};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Session {
    pub id: DbId,
    pub student_id: DbId,
    pub folder_id: DbId,
    /// Position within the folder, starting at 1. Not renumbered on delete.
    pub session_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    pub day_of_week: Option<i16>,
    pub duration_minutes: i32,
    pub status_id: StatusId,
    pub is_paid: bool,
    pub therapist_notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a session row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSession {
    pub student_id: DbId,
    pub folder_id: DbId,
    pub session_number: i32,
    pub title: String,
    pub description: Option<String>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    pub day_of_week: Option<i16>,
    pub duration_minutes: i32,
    /// Defaults to 1 (Locked) if omitted.
    pub status_id: Option<StatusId>,
    pub is_paid: Option<bool>,
    pub therapist_notes: Option<String>,
    /// Source document ID when imported from the legacy export.
    #[serde(default)]
    pub legacy_id: Option<String>,
}

/// DTO for updating a session's editable fields.
///
/// Status changes go through the status endpoint so transitions are checked.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSession {
    pub title: Option<String>,
    pub description: Option<String>,
    pub scheduled_date: Option<NaiveDate>,
    pub scheduled_time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
    pub is_paid: Option<bool>,
    pub therapist_notes: Option<String>,
}
