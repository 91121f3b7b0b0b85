//! Folder creation: schedule validation and session generation.
//!
//! A folder is created from a weekly schedule (`total_weeks` ×
//! `sessions_per_week`, one slot template per weekly slot). The generated
//! plan numbers sessions from 1 within the folder, independent of any other
//! folder owned by the same student.

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::session_status;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MIN_WEEKS: i32 = 1;
pub const MAX_WEEKS: i32 = 52;

pub const MIN_SESSIONS_PER_WEEK: i32 = 1;
pub const MAX_SESSIONS_PER_WEEK: i32 = 7;

/// Longest bookable session (8 hours).
pub const MAX_DURATION_MINUTES: i32 = 480;

/// Maximum folder name length in characters.
pub const MAX_FOLDER_NAME_LEN: usize = 200;

/// Slot times are written as 24h `HH:MM`.
const TIME_FORMAT: &str = "%H:%M";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One recurring weekly slot (e.g. "Tuesday 16:30 for 45 minutes").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotTemplate {
    /// 0 = Sunday .. 6 = Saturday.
    pub day_of_week: u8,
    /// Start time, `HH:MM`.
    pub time: String,
    pub duration_minutes: i32,
}

/// Everything needed to generate a folder's sessions.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub total_weeks: i32,
    pub sessions_per_week: i32,
    pub slots: Vec<SlotTemplate>,
    pub start_date: NaiveDate,
    /// Whether session #1 starts `available` instead of `locked`.
    pub first_session_available: bool,
}

/// A session row to be written, before it has an ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedSession {
    pub session_number: i32,
    pub title: String,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: NaiveTime,
    pub day_of_week: i16,
    pub duration_minutes: i32,
    pub status_id: i16,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a folder name: non-blank and at most [`MAX_FOLDER_NAME_LEN`] chars.
pub fn validate_folder_name(name: &str) -> Result<(), CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Folder name must not be empty".into()));
    }
    if trimmed.chars().count() > MAX_FOLDER_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Folder name must be at most {MAX_FOLDER_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate week/session counts and slot templates.
///
/// Runs before any write so an invalid request never leaves a partial folder.
pub fn validate_schedule(
    total_weeks: i32,
    sessions_per_week: i32,
    slots: &[SlotTemplate],
) -> Result<(), CoreError> {
    if !(MIN_WEEKS..=MAX_WEEKS).contains(&total_weeks) {
        return Err(CoreError::Validation(format!(
            "total_weeks must be between {MIN_WEEKS} and {MAX_WEEKS}, got {total_weeks}"
        )));
    }
    if !(MIN_SESSIONS_PER_WEEK..=MAX_SESSIONS_PER_WEEK).contains(&sessions_per_week) {
        return Err(CoreError::Validation(format!(
            "sessions_per_week must be between {MIN_SESSIONS_PER_WEEK} and \
             {MAX_SESSIONS_PER_WEEK}, got {sessions_per_week}"
        )));
    }
    if slots.len() != sessions_per_week as usize {
        return Err(CoreError::Validation(format!(
            "Expected {sessions_per_week} slot templates, got {}",
            slots.len()
        )));
    }
    for (i, slot) in slots.iter().enumerate() {
        validate_slot(slot).map_err(|msg| CoreError::Validation(format!("Slot {i}: {msg}")))?;
    }
    Ok(())
}

fn validate_slot(slot: &SlotTemplate) -> Result<NaiveTime, String> {
    if slot.day_of_week > 6 {
        return Err(format!(
            "day_of_week must be 0 (Sunday) to 6 (Saturday), got {}",
            slot.day_of_week
        ));
    }
    if !(1..=MAX_DURATION_MINUTES).contains(&slot.duration_minutes) {
        return Err(format!(
            "duration_minutes must be between 1 and {MAX_DURATION_MINUTES}, got {}",
            slot.duration_minutes
        ));
    }
    parse_slot_time(&slot.time)
}

/// Parse an `HH:MM` slot time.
pub fn parse_slot_time(time: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(time.trim(), TIME_FORMAT)
        .map_err(|_| format!("time must be HH:MM, got '{time}'"))
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Session title used for generated rows.
pub fn session_title(session_number: i32) -> String {
    format!("Session {session_number}")
}

/// Generate the `total_weeks × sessions_per_week` sessions of a new folder.
///
/// For week `w` and slot `s` (both 0-based): `session_number = 1 + w·S + s`
/// and `scheduled_date = start_date + 7w days`. Only session #1 may start
/// `available`; every other session starts `locked`.
pub fn plan_sessions(req: &ScheduleRequest) -> Result<Vec<PlannedSession>, CoreError> {
    validate_schedule(req.total_weeks, req.sessions_per_week, &req.slots)?;

    let times: Vec<NaiveTime> = req
        .slots
        .iter()
        .map(|slot| parse_slot_time(&slot.time).map_err(CoreError::Validation))
        .collect::<Result<_, _>>()?;

    let per_week = req.sessions_per_week;
    let mut planned = Vec::with_capacity((req.total_weeks * per_week) as usize);

    for week in 0..req.total_weeks {
        let scheduled_date = req
            .start_date
            .checked_add_signed(Duration::days(7 * i64::from(week)))
            .ok_or_else(|| CoreError::Validation("start_date out of range".into()))?;
        for (slot_index, slot) in req.slots.iter().enumerate() {
            let session_number = 1 + week * per_week + slot_index as i32;
            let status_id = if session_number == 1 && req.first_session_available {
                session_status::AVAILABLE
            } else {
                session_status::LOCKED
            };
            planned.push(PlannedSession {
                session_number,
                title: session_title(session_number),
                scheduled_date,
                scheduled_time: times[slot_index],
                day_of_week: i16::from(slot.day_of_week),
                duration_minutes: slot.duration_minutes,
                status_id,
            });
        }
    }

    Ok(planned)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn slot(day: u8, time: &str) -> SlotTemplate {
        SlotTemplate {
            day_of_week: day,
            time: time.to_string(),
            duration_minutes: 45,
        }
    }

    fn request(weeks: i32, per_week: i32) -> ScheduleRequest {
        ScheduleRequest {
            total_weeks: weeks,
            sessions_per_week: per_week,
            slots: (0..per_week).map(|i| slot(i as u8, "16:30")).collect(),
            start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            first_session_available: true,
        }
    }

    #[test]
    fn generates_weeks_times_sessions_contiguously_from_one() {
        for (weeks, per_week) in [(1, 1), (12, 1), (4, 3), (52, 7)] {
            let plan = plan_sessions(&request(weeks, per_week)).unwrap();
            let numbers: Vec<i32> = plan.iter().map(|p| p.session_number).collect();
            let expected: Vec<i32> = (1..=weeks * per_week).collect();
            assert_eq!(numbers, expected, "weeks={weeks} per_week={per_week}");
        }
    }

    #[test]
    fn week_index_drives_date_offset() {
        let plan = plan_sessions(&request(3, 2)).unwrap();
        let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(plan[0].scheduled_date, start);
        assert_eq!(plan[1].scheduled_date, start);
        assert_eq!(plan[2].scheduled_date, start + Duration::days(7));
        assert_eq!(plan[5].scheduled_date, start + Duration::days(14));
        assert_eq!(plan[3].day_of_week, 1);
    }

    #[test]
    fn only_first_session_starts_available() {
        let plan = plan_sessions(&request(2, 2)).unwrap();
        assert_eq!(plan[0].status_id, session_status::AVAILABLE);
        assert!(plan[1..]
            .iter()
            .all(|p| p.status_id == session_status::LOCKED));
    }

    #[test]
    fn all_locked_when_first_session_not_available() {
        let mut req = request(2, 1);
        req.first_session_available = false;
        let plan = plan_sessions(&req).unwrap();
        assert!(plan.iter().all(|p| p.status_id == session_status::LOCKED));
    }

    #[test]
    fn titles_follow_numbers() {
        let plan = plan_sessions(&request(1, 2)).unwrap();
        assert_eq!(plan[1].title, "Session 2");
    }

    #[test]
    fn rejects_out_of_range_weeks() {
        assert_matches!(
            plan_sessions(&request(0, 1)),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            plan_sessions(&request(53, 1)),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_out_of_range_sessions_per_week() {
        assert_matches!(
            validate_schedule(4, 8, &[]),
            Err(CoreError::Validation(msg)) if msg.contains("sessions_per_week")
        );
    }

    #[test]
    fn rejects_slot_count_mismatch() {
        let slots = vec![slot(1, "10:00")];
        assert_matches!(
            validate_schedule(4, 2, &slots),
            Err(CoreError::Validation(msg)) if msg.contains("Expected 2 slot templates")
        );
    }

    #[test]
    fn rejects_bad_slot_fields() {
        assert!(validate_schedule(1, 1, &[slot(7, "10:00")]).is_err());
        assert!(validate_schedule(1, 1, &[slot(1, "25:00")]).is_err());
        let mut long = slot(1, "10:00");
        long.duration_minutes = 0;
        assert!(validate_schedule(1, 1, &[long]).is_err());
    }

    #[test]
    fn rejects_start_date_past_calendar_end() {
        let mut req = request(2, 1);
        req.start_date = NaiveDate::MAX;
        assert_matches!(
            plan_sessions(&req),
            Err(CoreError::Validation(msg)) if msg.contains("start_date")
        );
    }

    #[test]
    fn folder_name_rules() {
        assert!(validate_folder_name("Spring articulation").is_ok());
        assert!(validate_folder_name("   ").is_err());
        assert!(validate_folder_name(&"x".repeat(201)).is_err());
    }
}
