//! The legacy document export and its mapping onto the relational schema.
//!
//! The export is one JSON file with three collections keyed by the old
//! document IDs:
//!
//! ```json
//! {
//!   "students": [{ "id": "s1", "name": "Ada", "parentEmail": "p@example.com" }],
//!   "folders":  [{ "id": "f1", "studentId": "s1", "name": "Term 1", "isActive": true,
//!                  "createdAt": "2025-09-01T09:00:00Z" }],
//!   "sessions": [{ "id": "x1", "studentId": "s1", "folderId": "f1", "sessionNumber": 1,
//!                  "date": "2025-09-02", "time": "16:00", "status": "completed" }]
//! }
//! ```
//!
//! Sessions without a (known) `folderId` are collected into a per-student
//! "Legacy Sessions" folder.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use speakwell_core::numbering::sequence_by_date;
use speakwell_core::session_status;
use speakwell_core::types::{DbId, Timestamp};
use speakwell_db::models::session::CreateSession;
use speakwell_db::models::status::StatusId;

/// Name of the folder that receives sessions exported without one.
pub const LEGACY_FOLDER_NAME: &str = "Legacy Sessions";

/// Duration assumed for exported sessions that carry none.
pub const DEFAULT_DURATION_MINUTES: i32 = 45;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyExport {
    #[serde(default)]
    pub students: Vec<LegacyStudent>,
    #[serde(default)]
    pub folders: Vec<LegacyFolder>,
    #[serde(default)]
    pub sessions: Vec<LegacySession>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyStudent {
    pub id: String,
    pub name: String,
    pub parent_name: Option<String>,
    pub parent_email: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyFolder {
    pub id: String,
    pub student_id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    pub created_at: Option<Timestamp>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySession {
    pub id: String,
    pub student_id: String,
    pub folder_id: Option<String>,
    pub session_number: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: NaiveDate,
    /// `HH:MM` or `HH:MM:SS`.
    pub time: Option<String>,
    pub duration_minutes: Option<i32>,
    pub status: Option<String>,
    #[serde(default)]
    pub is_paid: bool,
    pub therapist_notes: Option<String>,
    pub created_at: Option<Timestamp>,
}

impl LegacySession {
    /// Chronological ordering key: date, then creation time.
    pub fn order_key(&self) -> (NaiveDate, Timestamp) {
        (self.date, self.created_at.unwrap_or(DateTime::<Utc>::MIN_UTC))
    }
}

/// Read and parse the export file.
pub fn load_export(path: &Path) -> anyhow::Result<LegacyExport> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Import key of a student's "Legacy Sessions" folder.
pub fn legacy_folder_key(student_legacy_id: &str) -> String {
    format!("legacy-sessions:{student_legacy_id}")
}

/// Map an exported status name; unknown or missing statuses become Locked.
pub fn status_id(status: Option<&str>) -> StatusId {
    status
        .and_then(session_status::from_name)
        .unwrap_or(session_status::LOCKED)
}

pub fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M"))
        .ok()
}

/// Requested numbers for folder-less sessions: 1.. by date, then creation time.
pub fn orphan_numbers(sessions: &[&LegacySession]) -> Vec<Option<i32>> {
    let keys: Vec<(NaiveDate, Timestamp)> = sessions.iter().map(|s| s.order_key()).collect();
    sequence_by_date(&keys).into_iter().map(Some).collect()
}

/// Build the insert DTO for an exported session.
pub fn to_create_session(
    session: &LegacySession,
    student_id: DbId,
    folder_id: DbId,
    session_number: i32,
) -> CreateSession {
    CreateSession {
        student_id,
        folder_id,
        session_number,
        title: session
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| format!("Session {session_number}")),
        description: session.description.clone(),
        scheduled_date: session.date,
        scheduled_time: session.time.as_deref().and_then(parse_time),
        day_of_week: Some(session.date.weekday().num_days_from_sunday() as i16),
        duration_minutes: session
            .duration_minutes
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_DURATION_MINUTES),
        status_id: Some(status_id(session.status.as_deref())),
        is_paid: Some(session.is_paid),
        therapist_notes: session.therapist_notes.clone(),
        legacy_id: Some(session.id.clone()),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    use super::*;

    const SAMPLE: &str = r#"{
        "students": [{ "id": "s1", "name": "Ada", "parentEmail": "p@example.com" }],
        "folders": [
            { "id": "f1", "studentId": "s1", "name": "Term 1", "isActive": true,
              "createdAt": "2025-09-01T09:00:00Z" },
            { "id": "f2", "studentId": "s1", "name": "Term 2" }
        ],
        "sessions": [
            { "id": "x1", "studentId": "s1", "folderId": "f1", "sessionNumber": 1,
              "date": "2025-09-02", "time": "16:00", "status": "completed", "isPaid": true },
            { "id": "x2", "studentId": "s1", "date": "2025-08-20" }
        ]
    }"#;

    fn session(id: &str, day: u32, created_hour: Option<u32>) -> LegacySession {
        LegacySession {
            id: id.to_string(),
            student_id: "s1".to_string(),
            folder_id: None,
            session_number: None,
            title: None,
            description: None,
            date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
            time: None,
            duration_minutes: None,
            status: None,
            is_paid: false,
            therapist_notes: None,
            created_at: created_hour.map(|h| Utc.with_ymd_and_hms(2025, 8, 1, h, 0, 0).unwrap()),
        }
    }

    #[test]
    fn parses_camel_case_export_with_defaults() {
        let export: LegacyExport = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(export.students.len(), 1);
        assert_eq!(export.students[0].parent_email.as_deref(), Some("p@example.com"));
        assert!(export.folders[0].is_active);
        assert!(!export.folders[1].is_active);
        assert!(export.folders[1].created_at.is_none());
        assert_eq!(export.sessions[0].folder_id.as_deref(), Some("f1"));
        assert!(export.sessions[1].folder_id.is_none());
        assert!(!export.sessions[1].is_paid);
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let export: LegacyExport = serde_json::from_str("{}").unwrap();
        assert!(export.students.is_empty());
        assert!(export.sessions.is_empty());
    }

    #[test]
    fn statuses_map_with_locked_fallback() {
        assert_eq!(status_id(Some("completed")), session_status::COMPLETED);
        assert_eq!(status_id(Some("Canceled")), session_status::CANCELLED);
        assert_eq!(status_id(Some("archived")), session_status::LOCKED);
        assert_eq!(status_id(None), session_status::LOCKED);
    }

    #[test]
    fn times_accept_minutes_and_seconds() {
        assert_eq!(parse_time("16:30"), NaiveTime::from_hms_opt(16, 30, 0));
        assert_eq!(parse_time("09:05:10"), NaiveTime::from_hms_opt(9, 5, 10));
        assert_eq!(parse_time("4pm"), None);
    }

    #[test]
    fn orphans_are_numbered_by_date_then_creation() {
        let a = session("a", 20, None);
        let b = session("b", 3, Some(10));
        let c = session("c", 3, Some(8));
        assert_eq!(orphan_numbers(&[&a, &b, &c]), vec![Some(3), Some(2), Some(1)]);
    }

    #[test]
    fn create_dto_fills_defaults() {
        let mut s = session("x9", 2, None);
        s.title = Some("  ".to_string());
        s.time = Some("16:00".to_string());

        let dto = to_create_session(&s, 7, 11, 4);
        assert_eq!(dto.title, "Session 4");
        assert_eq!(dto.duration_minutes, DEFAULT_DURATION_MINUTES);
        assert_eq!(dto.status_id, Some(session_status::LOCKED));
        assert_eq!(dto.legacy_id.as_deref(), Some("x9"));
        // 2025-09-02 is a Tuesday.
        assert_eq!(dto.day_of_week, Some(2));
        assert_matches!(dto.scheduled_time, Some(t) if t == NaiveTime::from_hms_opt(16, 0, 0).unwrap());
    }
}
