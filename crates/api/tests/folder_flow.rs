//! End-to-end folder lifecycle through the HTTP API against a real database.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, delete, get, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

async fn create_student(pool: &PgPool, name: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/students",
        json!({ "name": name, "parent_email": "parent@example.com" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

async fn create_folder(pool: &PgPool, student_id: i64, name: &str) -> Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/folders",
        json!({
            "student_id": student_id,
            "name": name,
            "total_weeks": 2,
            "sessions_per_week": 2,
            "start_date": "2026-01-05",
            "slots": [
                { "day_of_week": 1, "time": "16:00", "duration_minutes": 45 },
                { "day_of_week": 4, "time": "16:30", "duration_minutes": 30 }
            ]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

// ---------------------------------------------------------------------------
// Test: folder creation writes numbered sessions and reconciles counts
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_folder_generates_sessions(pool: PgPool) {
    let student_id = create_student(&pool, "Ada").await;
    let created = create_folder(&pool, student_id, "Spring Block").await;

    assert_eq!(created["folder"]["total_sessions"], 4);
    assert_eq!(created["folder"]["completed_sessions"], 0);
    assert_eq!(created["folder"]["is_active"], true);
    assert_eq!(created["sessions"]["succeeded"].as_array().unwrap().len(), 4);
    assert!(created["sessions"]["failed"].as_array().unwrap().is_empty());

    let folder_id = created["folder"]["id"].as_i64().unwrap();
    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/folders/{folder_id}/sessions"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let sessions = body_json(response).await["data"].as_array().unwrap().clone();
    let numbers: Vec<i64> = sessions
        .iter()
        .map(|s| s["session_number"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
    assert_eq!(sessions[0]["status_id"], 2);
    assert_eq!(sessions[1]["status_id"], 1);
    assert_eq!(sessions[2]["scheduled_date"], "2026-01-12");
    assert_eq!(sessions[1]["duration_minutes"], 30);
}

// ---------------------------------------------------------------------------
// Test: completing a session unlocks the next and awards a trophy
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn completing_a_session_updates_progress(pool: PgPool) {
    let student_id = create_student(&pool, "Ben").await;
    let created = create_folder(&pool, student_id, "Block A").await;
    let first = created["sessions"]["succeeded"][0].as_i64().unwrap();

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/sessions/{first}/status"),
        json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let outcome = body_json(response).await["data"].clone();
    assert_eq!(outcome["session"]["status_id"], 3);
    assert_eq!(outcome["unlocked"]["session_number"], 2);
    assert_eq!(outcome["folder"]["completed_sessions"], 1);
    let awarded: Vec<&str> = outcome["awarded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["code"].as_str().unwrap())
        .collect();
    assert_eq!(awarded, vec!["first_session"]);

    // Completed is terminal.
    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/sessions/{first}/status"),
        json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: switching the active folder and deleting folders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn active_folder_switch_and_delete(pool: PgPool) {
    let student_id = create_student(&pool, "Cleo").await;
    let first = create_folder(&pool, student_id, "Term 1").await;
    let second = create_folder(&pool, student_id, "Term 2").await;
    let first_id = first["folder"]["id"].as_i64().unwrap();
    let second_id = second["folder"]["id"].as_i64().unwrap();

    assert_eq!(second["folder"]["is_active"], false);

    // Each folder numbers its own sessions from 1.
    let mut all_ids = Vec::new();
    for (created, folder_id) in [(&first, first_id), (&second, second_id)] {
        assert!(created["sessions"]["failed"].as_array().unwrap().is_empty());

        let response = get(
            build_test_app(pool.clone()),
            &format!("/api/v1/folders/{folder_id}/sessions"),
        )
        .await;
        let sessions = body_json(response).await["data"].as_array().unwrap().clone();
        let numbers: Vec<i64> = sessions
            .iter()
            .map(|s| s["session_number"].as_i64().unwrap())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4]);
        all_ids.extend(sessions.iter().map(|s| s["id"].as_i64().unwrap()));
    }
    all_ids.sort_unstable();
    all_ids.dedup();
    assert_eq!(all_ids.len(), 8);

    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/students/{student_id}/active-folder"),
        json!({ "folder_id": second_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["active_folder_id"], second_id);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/folders/{first_id}"),
    )
    .await;
    assert_eq!(body_json(response).await["data"]["is_active"], false);

    // Another student's folder cannot be activated.
    let other = create_student(&pool, "Dev").await;
    let response = put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/students/{other}/active-folder"),
        json!({ "folder_id": first_id }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Non-empty folders need an explicit cascade.
    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/folders/{first_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = delete(
        build_test_app(pool.clone()),
        &format!("/api/v1/folders/{first_id}?cascade=true"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/folders/{first_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: messages and the unread badge
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_messages_count_as_unread_until_read(pool: PgPool) {
    let student_id = create_student(&pool, "Eve").await;

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/students/{student_id}/messages"),
        json!({ "sender": "admin", "body": "  Great work this week!  " }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let message = body_json(response).await["data"].clone();
    assert_eq!(message["body"], "Great work this week!");
    let message_id = message["id"].as_i64().unwrap();

    let progress_path = format!("/api/v1/students/{student_id}/achievements");
    let response = get(build_test_app(pool.clone()), &progress_path).await;
    assert_eq!(body_json(response).await["data"]["unread_from_admin"], 1);

    let response = post_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/messages/{message_id}/read"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(build_test_app(pool.clone()), &progress_path).await;
    assert_eq!(body_json(response).await["data"]["unread_from_admin"], 0);
}
