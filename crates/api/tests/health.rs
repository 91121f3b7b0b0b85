mod common;

use axum::http::StatusCode;
use common::{body_json, get, offline_app};

#[tokio::test]
async fn health_reports_degraded_without_database() {
    let response = get(offline_app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let response = get(offline_app(), "/health").await;
    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header missing")
        .to_str()
        .unwrap();
    assert_eq!(request_id.len(), 36, "expected a UUID, got {request_id}");
}

#[tokio::test]
async fn unknown_route_is_404() {
    let response = get(offline_app(), "/api/v1/does-not-exist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn achievement_catalog_lists_milestones() {
    let response = get(offline_app(), "/api/v1/achievements/catalog").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let codes: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"first_session"));
    assert_eq!(codes.len(), speakwell_core::achievements::SESSION_MILESTONES.len() + 1);
}
