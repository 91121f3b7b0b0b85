//! Batch writer for newly generated folder sessions.

use std::time::Duration;

use speakwell_core::batch::{run_sequential, BatchReport, RetryPolicy};
use speakwell_core::folder_schedule::PlannedSession;
use speakwell_core::types::DbId;
use speakwell_db::models::session::CreateSession;
use speakwell_db::repositories::SessionRepo;
use sqlx::PgPool;

/// Insert `planned` sessions into a folder one at a time.
///
/// Each insert is idempotent on the folder/number key, so a retried write
/// after a lost response returns the row written by the first attempt.
/// Failed items are reported, never rolled back.
pub async fn write_planned_sessions(
    pool: &PgPool,
    student_id: DbId,
    folder_id: DbId,
    planned: Vec<PlannedSession>,
    throttle: Duration,
    policy: RetryPolicy,
) -> BatchReport<PlannedSession> {
    let total = planned.len();

    let report = run_sequential(planned, throttle, policy, |session| {
        let input = to_create_session(student_id, folder_id, session);
        async move {
            let row = SessionRepo::create_planned(pool, &input).await?;
            Ok::<_, sqlx::Error>(row.id)
        }
    })
    .await;

    for failure in &report.failed {
        tracing::warn!(
            folder_id,
            session_number = failure.item.session_number,
            attempts = failure.attempts,
            error = %failure.error,
            "Session insert failed",
        );
    }

    tracing::info!(
        folder_id,
        total,
        succeeded = report.succeeded_count(),
        failed = report.failed_count(),
        "Folder sessions written",
    );

    report
}

fn to_create_session(student_id: DbId, folder_id: DbId, planned: &PlannedSession) -> CreateSession {
    CreateSession {
        student_id,
        folder_id,
        session_number: planned.session_number,
        title: planned.title.clone(),
        description: None,
        scheduled_date: planned.scheduled_date,
        scheduled_time: Some(planned.scheduled_time),
        day_of_week: Some(planned.day_of_week),
        duration_minutes: planned.duration_minutes,
        status_id: Some(planned.status_id),
        is_paid: Some(false),
        therapist_notes: None,
        legacy_id: None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use speakwell_core::session_status;

    use super::*;

    #[test]
    fn planned_fields_carry_over() {
        let planned = PlannedSession {
            session_number: 4,
            title: "Session 4".into(),
            scheduled_date: NaiveDate::from_ymd_opt(2026, 3, 9).unwrap(),
            scheduled_time: NaiveTime::from_hms_opt(16, 30, 0).unwrap(),
            day_of_week: 1,
            duration_minutes: 45,
            status_id: session_status::LOCKED,
        };

        let input = to_create_session(7, 11, &planned);

        assert_eq!(input.student_id, 7);
        assert_eq!(input.folder_id, 11);
        assert_eq!(input.session_number, 4);
        assert_eq!(input.scheduled_time, Some(planned.scheduled_time));
        assert_eq!(input.day_of_week, Some(1));
        assert_eq!(input.status_id, Some(session_status::LOCKED));
        assert_eq!(input.legacy_id, None);
    }
}
