use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use futures::StreamExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use focus_timer::{create_router, AppState, TimerConfig};

fn app(config: TimerConfig) -> (Arc<AppState>, Router) {
    let state = Arc::new(AppState::new(20553, "127.0.0.1".to_string(), config).unwrap());
    let router = create_router(Arc::clone(&state));
    (state, router)
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn fresh_timer_is_stopped_in_work() {
    let (_, router) = app(TimerConfig::default());
    let (status, body) = send(&router, Method::GET, "/timer", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "stopped");
    assert_eq!(body["timer"]["phase"], "work");
    assert_eq!(body["timer"]["remainingSeconds"], 1500);
    assert_eq!(body["timer"]["display"], "25:00");
    assert_eq!(body["timer"]["running"], false);
    assert_eq!(body["timer"]["completedWorkSessions"], 0);
    assert_eq!(body["timer"]["nextPhase"], "shortBreak");
    assert_eq!(body["timer"]["sessionInCycle"], 1);
}

#[tokio::test]
async fn start_pause_and_toggle() {
    let (_, router) = app(TimerConfig::default());

    let (_, body) = send(&router, Method::POST, "/timer/start", None).await;
    assert_eq!(body["status"], "running");

    let (_, body) = send(&router, Method::POST, "/timer/pause", None).await;
    assert_eq!(body["timer"]["running"], false);
    let (_, body) = send(&router, Method::POST, "/timer/pause", None).await;
    assert_eq!(body["timer"]["running"], false);

    let (_, body) = send(&router, Method::POST, "/timer/toggle", None).await;
    assert_eq!(body["timer"]["running"], true);
}

#[tokio::test]
async fn reset_restarts_cycle() {
    let (state, router) = app(TimerConfig::new(1, 1, 1, 4, false));
    state.start_timer().unwrap();
    for _ in 0..60 {
        state.tick_timer().unwrap();
    }

    let (_, body) = send(&router, Method::GET, "/timer", None).await;
    assert_eq!(body["timer"]["phase"], "shortBreak");
    assert_eq!(body["timer"]["completedWorkSessions"], 1);

    let (status, body) = send(&router, Method::POST, "/timer/reset", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["phase"], "work");
    assert_eq!(body["timer"]["remainingSeconds"], 60);
    assert_eq!(body["timer"]["completedWorkSessions"], 0);
    assert_eq!(body["message"], "Timer reset to 1 minutes");
}

#[tokio::test]
async fn valid_config_is_applied() {
    let (_, router) = app(TimerConfig::default());
    let (status, body) = send(
        &router,
        Method::PUT,
        "/timer/config",
        Some(json!({
            "workDuration": 50,
            "shortBreakDuration": 10,
            "longBreakDuration": 30,
            "longBreakInterval": 2,
            "autoStartNext": true
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["timer"]["remainingSeconds"], 3000);
    assert_eq!(body["timer"]["config"]["autoStartNext"], true);

    let (_, body) = send(&router, Method::GET, "/timer/config", None).await;
    assert_eq!(body["config"]["workDuration"], 50);
    assert_eq!(body["limits"][1]["field"], "shortBreakDuration");
    assert_eq!(body["limits"][1]["max"], 30);
}

#[tokio::test]
async fn invalid_config_names_each_field() {
    let (_, router) = app(TimerConfig::default());
    let (status, body) = send(
        &router,
        Method::PUT,
        "/timer/config",
        Some(json!({
            "workDuration": 0,
            "longBreakDuration": 15,
            "longBreakInterval": 11
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["workDuration", "shortBreakDuration", "longBreakInterval"]);
    assert_eq!(body["errors"][1]["reason"], "is required");

    let (_, body) = send(&router, Method::GET, "/timer/config", None).await;
    assert_eq!(body["config"]["workDuration"], 25);
}

#[tokio::test]
async fn empty_form_values_are_reported_per_field() {
    let (_, router) = app(TimerConfig::default());
    let (status, body) = send(
        &router,
        Method::PUT,
        "/timer/config",
        Some(json!({
            "workDuration": "",
            "shortBreakDuration": 25.5,
            "longBreakDuration": 99999999999999999999u128 as f64,
            "longBreakInterval": 4
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], "error");
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["workDuration", "shortBreakDuration", "longBreakDuration"]);
    assert_eq!(body["errors"][1]["reason"], "Must be between 1-30 minutes");

    let (_, body) = send(&router, Method::GET, "/timer/config", None).await;
    assert_eq!(body["config"]["workDuration"], 25);
}

#[tokio::test]
async fn events_stream_one_phase_change_per_transition() {
    let (state, router) = app(TimerConfig::new(1, 1, 1, 4, false));
    let request = Request::builder().uri("/events").body(Body::empty()).unwrap();
    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");

    state.start_timer().unwrap();
    for _ in 0..60 {
        state.tick_timer().unwrap();
    }

    let mut frames = response.into_body().into_data_stream();
    let frame = tokio::time::timeout(Duration::from_secs(1), frames.next())
        .await
        .expect("phase change should be streamed")
        .unwrap()
        .unwrap();
    let text = String::from_utf8(frame.to_vec()).unwrap();
    assert!(text.starts_with("event: phase-change\n"), "unexpected frame: {}", text);

    let data = text
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .unwrap();
    let payload: Value = serde_json::from_str(data).unwrap();
    assert_eq!(payload["newPhase"], "shortBreak");
    assert_eq!(payload["completedWorkSessions"], 1);
    assert_eq!(payload["message"], "Take a short break! You've earned it");

    // stopped after the transition, so no second event follows
    let next = tokio::time::timeout(Duration::from_millis(200), frames.next()).await;
    assert!(next.is_err(), "unexpected second frame");
}

#[tokio::test]
async fn task_lifecycle() {
    let (_, router) = app(TimerConfig::default());

    let (status, body) = send(&router, Method::POST, "/tasks", Some(json!({ "text": "  draft outline " }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["text"], "draft outline");
    let id = body["task"]["id"].as_u64().unwrap();

    let (status, _) = send(&router, Method::POST, "/tasks", Some(json!({ "text": "   " }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&router, Method::POST, &format!("/tasks/{}/toggle", id), None).await;
    assert_eq!(body["task"]["completed"], true);
    assert_eq!(body["message"], "\"draft outline\" has been marked as complete.");

    let (_, body) = send(&router, Method::GET, "/tasks", None).await;
    assert_eq!(body["stats"]["total"], 1);
    assert_eq!(body["stats"]["completed"], 1);

    let (status, _) = send(&router, Method::DELETE, &format!("/tasks/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&router, Method::DELETE, &format!("/tasks/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("no task with id {}", id));
}

#[tokio::test]
async fn focus_mode_and_note() {
    let (_, router) = app(TimerConfig::default());

    let (_, body) = send(&router, Method::POST, "/focus/toggle", None).await;
    assert_eq!(body["focusMode"], true);

    let (_, body) = send(&router, Method::PUT, "/note", Some(json!({ "text": "call the dentist" }))).await;
    assert_eq!(body["note"], "call the dentist");
    assert_eq!(body["noteLength"], 16);
    assert_eq!(body["noteLimit"], 500);

    let long = "x".repeat(501);
    let (status, _) = send(&router, Method::PUT, "/note", Some(json!({ "text": long }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(&router, Method::DELETE, "/note", None).await;
    assert_eq!(body["note"], "");

    let (_, body) = send(&router, Method::GET, "/status", None).await;
    assert_eq!(body["focusMode"], true);
    assert_eq!(body["lastAction"], "clear-note");
    assert_eq!(body["port"], 20553);
}

#[tokio::test]
async fn health_reports_ok() {
    let (_, router) = app(TimerConfig::default());
    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
