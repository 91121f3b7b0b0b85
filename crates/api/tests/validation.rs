//! Requests rejected before any database access.
//!
//! The router runs against a pool that cannot connect, so a 400 here proves
//! validation happens up front.

mod common;

use axum::http::StatusCode;
use common::{body_json, offline_app, post_json, post_multipart, put_json};
use serde_json::json;

fn folder_body() -> serde_json::Value {
    json!({
        "student_id": 1,
        "name": "Spring Block",
        "total_weeks": 4,
        "sessions_per_week": 2,
        "slots": [
            { "day_of_week": 1, "time": "16:00", "duration_minutes": 45 },
            { "day_of_week": 4, "time": "16:30", "duration_minutes": 45 }
        ]
    })
}

async fn assert_validation_error(response: axum::response::Response) {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].is_string());
}

// ---------------------------------------------------------------------------
// Folders
// ---------------------------------------------------------------------------

#[tokio::test]
async fn folder_with_zero_weeks_is_rejected() {
    let mut body = folder_body();
    body["total_weeks"] = json!(0);
    let response = post_json(offline_app(), "/api/v1/folders", body).await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn folder_slot_count_must_match_sessions_per_week() {
    let mut body = folder_body();
    body["sessions_per_week"] = json!(3);
    let response = post_json(offline_app(), "/api/v1/folders", body).await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn folder_slot_time_must_parse() {
    let mut body = folder_body();
    body["slots"][0]["time"] = json!("25:00");
    let response = post_json(offline_app(), "/api/v1/folders", body).await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn folder_name_must_not_be_blank() {
    let mut body = folder_body();
    body["name"] = json!("   ");
    let response = post_json(offline_app(), "/api/v1/folders", body).await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn folder_start_date_past_calendar_end_is_rejected() {
    let mut body = folder_body();
    body["start_date"] = json!("+262142-12-30");
    let response = post_json(offline_app(), "/api/v1/folders", body).await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn folder_missing_fields_is_unprocessable() {
    let response = post_json(offline_app(), "/api/v1/folders", json!({ "name": "x" })).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn folder_update_rejects_unknown_status() {
    let response = put_json(
        offline_app(),
        "/api/v1/folders/1",
        json!({ "status_id": 99 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Students
// ---------------------------------------------------------------------------

#[tokio::test]
async fn student_with_invalid_parent_email_is_rejected() {
    let response = post_json(
        offline_app(),
        "/api/v1/students",
        json!({ "name": "Ada", "parent_email": "not-an-email" }),
    )
    .await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn student_with_empty_name_is_rejected() {
    let response = post_json(offline_app(), "/api/v1/students", json!({ "name": "" })).await;
    assert_validation_error(response).await;
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_session_status_is_rejected() {
    let response = post_json(
        offline_app(),
        "/api/v1/sessions/1/status",
        json!({ "status": "bogus" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn session_duration_out_of_range_is_rejected() {
    let response = put_json(
        offline_app(),
        "/api/v1/sessions/1",
        json!({ "duration_minutes": 0 }),
    )
    .await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn session_title_must_not_be_blank() {
    let response = put_json(offline_app(), "/api/v1/sessions/1", json!({ "title": " " })).await;
    assert_validation_error(response).await;
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn message_with_unknown_sender_is_rejected() {
    let response = post_json(
        offline_app(),
        "/api/v1/students/1/messages",
        json!({ "sender": "robot", "body": "hello" }),
    )
    .await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn message_with_blank_body_is_rejected() {
    let response = post_json(
        offline_app(),
        "/api/v1/students/1/messages",
        json!({ "sender": "admin", "body": "   " }),
    )
    .await;
    assert_validation_error(response).await;
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let response = post_multipart(
        offline_app(),
        "/api/v1/sessions/1/materials",
        &[("note", None, &b"hello"[..])],
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_over_configured_limit_is_rejected() {
    let data = vec![b'x'; common::test_config().max_upload_bytes + 1];
    let response = post_multipart(
        offline_app(),
        "/api/v1/sessions/1/materials",
        &[("file", Some("worksheet.pdf"), data.as_slice())],
    )
    .await;
    assert_validation_error(response).await;
}

#[tokio::test]
async fn empty_upload_is_rejected() {
    let response = post_multipart(
        offline_app(),
        "/api/v1/sessions/1/materials",
        &[("file", Some("empty.pdf"), &b""[..])],
    )
    .await;
    assert_validation_error(response).await;
}
