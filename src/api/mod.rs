//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer", get(timer_handler))
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/toggle", post(toggle_handler))
        .route("/timer/reset", post(reset_handler))
        .route("/timer/config", get(get_config_handler).put(put_config_handler))
        .route("/events", get(events_handler))
        // Dashboard tools
        .route("/dashboard", get(dashboard_handler))
        .route("/focus/toggle", post(focus_handler))
        .route("/note", put(put_note_handler).delete(clear_note_handler))
        .route("/tasks", get(tasks_handler).post(add_task_handler))
        .route("/tasks/:id/toggle", post(toggle_task_handler))
        .route("/tasks/:id", delete(delete_task_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
