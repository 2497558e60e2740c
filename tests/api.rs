//! Endpoint-level tests driving the router directly

use std::{sync::Arc, time::Duration};

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use split_second::{
    api::create_router,
    state::{AppState, Mode},
};

fn test_app() -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(
        0,
        "127.0.0.1".to_string(),
        Duration::from_millis(16),
        Mode::Running,
    ));
    let router = create_router(Arc::clone(&state));
    (state, router)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, body)
}

#[tokio::test]
async fn health_reports_ok() {
    let (_state, app) = test_app();
    let (status, body) = send(&app, Method::GET, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn initial_status_is_stopped_at_zero() {
    let (_state, app) = test_app();
    let (status, body) = send(&app, Method::GET, "/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["running"], false);
    assert_eq!(body["elapsed_ms"], 0);
    assert_eq!(body["lap_count"], 0);
    assert_eq!(body["progress"], 0.0);
    assert_eq!(body["display"]["hours"], "00");
    assert_eq!(body["display"]["millis"], "000");
    assert_eq!(body["mode"]["id"], "running");
    assert_eq!(body["mode"]["name"], "Running");
}

#[tokio::test]
async fn start_lap_status_flow() {
    let (_state, app) = test_app();

    let (status, body) = send(&app, Method::POST, "/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["session"]["running"], true);

    let (status, body) = send(&app, Method::POST, "/lap").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["lap_count"], 1);

    let (status, body) = send(&app, Method::GET, "/laps").await;
    assert_eq!(status, StatusCode::OK);
    let laps = body["laps"].as_array().unwrap();
    assert_eq!(laps.len(), 1);
    assert_eq!(laps[0]["number"], 1);
    // A single lap carries no highlighting
    assert_eq!(laps[0]["fastest"], false);
    assert_eq!(laps[0]["slowest"], false);
    assert_eq!(laps[0]["cumulative_ms"], laps[0]["delta_ms"]);
}

#[tokio::test]
async fn second_start_is_a_noop() {
    let (_state, app) = test_app();

    send(&app, Method::POST, "/start").await;
    let (status, body) = send(&app, Method::POST, "/start").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "noop");
    assert_eq!(body["session"]["running"], true);
}

#[tokio::test]
async fn lap_before_start_is_rejected() {
    let (_state, app) = test_app();

    let (status, body) = send(&app, Method::POST, "/lap").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["session"]["lap_count"], 0);

    let (_, body) = send(&app, Method::GET, "/laps").await;
    assert!(body["laps"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn mode_change_while_running_is_rejected() {
    let (state, app) = test_app();

    send(&app, Method::POST, "/start").await;
    send(&app, Method::POST, "/lap").await;

    let (status, body) = send(&app, Method::POST, "/mode/cycling").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "rejected");
    assert_eq!(body["message"], "Stop the timer to change modes!");

    // Nothing mutated by the rejection
    let session = state.status().unwrap();
    assert_eq!(session.mode, Mode::Running);
    assert!(session.running);
    assert_eq!(session.lap_count, 1);
}

#[tokio::test]
async fn mode_change_while_stopped_applies_and_resets() {
    let (_state, app) = test_app();

    send(&app, Method::POST, "/start").await;
    send(&app, Method::POST, "/lap").await;
    send(&app, Method::POST, "/pause").await;

    let (status, body) = send(&app, Method::POST, "/mode/swimming").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["mode"], "swimming");
    assert_eq!(body["session"]["elapsed_ms"], 0);
    assert_eq!(body["session"]["lap_count"], 0);

    let (_, body) = send(&app, Method::GET, "/status").await;
    assert_eq!(body["mode"]["id"], "swimming");
    assert_eq!(body["mode"]["icon"], "🏊");
}

#[tokio::test]
async fn unknown_mode_is_rejected_without_side_effects() {
    let (state, app) = test_app();

    let (status, body) = send(&app, Method::POST, "/mode/rowing").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "rejected");

    assert_eq!(state.status().unwrap().mode, Mode::Running);
}

#[tokio::test]
async fn reset_clears_session_from_any_state() {
    let (_state, app) = test_app();

    send(&app, Method::POST, "/start").await;
    send(&app, Method::POST, "/lap").await;
    send(&app, Method::POST, "/lap").await;

    let (status, body) = send(&app, Method::POST, "/reset").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["session"]["running"], false);
    assert_eq!(body["session"]["elapsed_ms"], 0);
    assert_eq!(body["session"]["lap_count"], 0);

    // After a reset, laps are gated behind the next start again
    let (status, _) = send(&app, Method::POST, "/lap").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn pause_is_idempotent_over_http() {
    let (_state, app) = test_app();

    send(&app, Method::POST, "/start").await;
    let (status, first) = send(&app, Method::POST, "/pause").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["session"]["running"], false);

    let (status, second) = send(&app, Method::POST, "/pause").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["session"]["running"], false);
    assert_eq!(second["session"]["elapsed_ms"], first["session"]["elapsed_ms"]);
}

#[tokio::test]
async fn events_endpoint_streams_sse() {
    let (_state, app) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/event-stream"));
}

#[tokio::test]
async fn status_tracks_last_action() {
    let (_state, app) = test_app();

    let (_, body) = send(&app, Method::GET, "/status").await;
    assert!(body["last_action"].is_null());

    send(&app, Method::POST, "/start").await;
    let (_, body) = send(&app, Method::GET, "/status").await;
    assert_eq!(body["last_action"], "start");
    assert!(body["last_action_time"].is_string());
}
