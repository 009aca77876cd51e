//! HTTP endpoint handlers

use std::{convert::Infallible, sync::Arc};
use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use crate::{
    error::AppError,
    state::{AppState, ConfigDraft, ConfigField},
};
use super::responses::{
    ConfigResponse, DashboardResponse, FieldLimit, HealthResponse, PhaseChangeEvent,
    StatusResponse, TaskResponse, TextRequest, TimerResponse,
};

type ApiResult<T> = Result<Json<T>, AppError>;

/// Handle GET /timer - Return the current timer
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let timer = state.get_timer()?;
    Ok(Json(TimerResponse::new(format!("{} {}", timer.label, timer.display), timer)))
}

/// Handle POST /timer/start - Start counting down
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let timer = state.start_timer()?;
    let message = if timer.state.running { "Timer running" } else { "Timer could not be started" };
    Ok(Json(TimerResponse::new(message, timer)))
}

/// Handle POST /timer/pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let timer = state.pause_timer()?;
    Ok(Json(TimerResponse::new("Timer paused", timer)))
}

/// Handle POST /timer/toggle - Start or pause, like the play button
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let timer = state.toggle_timer()?;
    let message = if timer.state.running { "Timer running" } else { "Timer paused" };
    Ok(Json(TimerResponse::new(message, timer)))
}

/// Handle POST /timer/reset - Restart the cycle
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<TimerResponse> {
    let timer = state.reset_timer()?;
    let message = format!("Timer reset to {} minutes", timer.config.work_minutes);
    Ok(Json(TimerResponse::new(message, timer)))
}

/// Handle GET /timer/config - Return the active configuration
pub async fn get_config_handler(State(state): State<Arc<AppState>>) -> ApiResult<ConfigResponse> {
    let config = state.get_timer_config()?;
    let limits = [
        ConfigField::WorkDuration,
        ConfigField::ShortBreakDuration,
        ConfigField::LongBreakDuration,
        ConfigField::LongBreakInterval,
    ]
    .into_iter()
    .map(|field| {
        let (min, max) = field.range();
        FieldLimit { field: field.as_str().to_string(), min, max }
    })
    .collect();
    Ok(Json(ConfigResponse { config, limits }))
}

/// Handle PUT /timer/config - Validate and apply a new configuration
pub async fn put_config_handler(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<ConfigDraft>,
) -> ApiResult<TimerResponse> {
    let timer = state.apply_timer_config(draft)?;
    info!("Timer configuration updated");
    Ok(Json(TimerResponse::new("Timer configuration updated", timer)))
}

/// Handle GET /events - Stream phase changes as server-sent events
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.subscribe_phase_changes();
    info!("Phase change subscriber connected");

    let events = stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(change) => {
                    let payload = PhaseChangeEvent::from(change);
                    let event = match Event::default().event("phase-change").json_data(&payload) {
                        Ok(event) => event,
                        Err(e) => {
                            warn!("Failed to encode phase change event: {}", e);
                            continue;
                        }
                    };
                    return Some((Ok(event), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!("Phase change subscriber lagged, skipped {} events", skipped);
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

/// Handle GET /dashboard - Return focus mode, note and tasks
pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> ApiResult<DashboardResponse> {
    Ok(Json(state.get_dashboard()?.into()))
}

/// Handle POST /focus/toggle - Flip focus mode
pub async fn focus_handler(State(state): State<Arc<AppState>>) -> ApiResult<DashboardResponse> {
    state.toggle_focus()?;
    Ok(Json(state.get_dashboard()?.into()))
}

/// Handle PUT /note - Replace the quick note
pub async fn put_note_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextRequest>,
) -> ApiResult<DashboardResponse> {
    state.set_note(request.text)?;
    Ok(Json(state.get_dashboard()?.into()))
}

/// Handle DELETE /note - Clear the quick note
pub async fn clear_note_handler(State(state): State<Arc<AppState>>) -> ApiResult<DashboardResponse> {
    state.clear_note()?;
    Ok(Json(state.get_dashboard()?.into()))
}

/// Handle GET /tasks - Return the task list
pub async fn tasks_handler(State(state): State<Arc<AppState>>) -> ApiResult<DashboardResponse> {
    Ok(Json(state.get_dashboard()?.into()))
}

/// Handle POST /tasks - Add a task
pub async fn add_task_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TextRequest>,
) -> ApiResult<TaskResponse> {
    let task = state.add_task(&request.text)?;
    let message = format!("\"{}\" has been added to your tasks.", task.text);
    Ok(Json(TaskResponse::new(message, task)))
}

/// Handle POST /tasks/:id/toggle - Complete or reopen a task
pub async fn toggle_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<TaskResponse> {
    let task = state.toggle_task(id)?;
    let message = if task.completed {
        format!("\"{}\" has been marked as complete.", task.text)
    } else {
        format!("\"{}\" has been reopened.", task.text)
    };
    Ok(Json(TaskResponse::new(message, task)))
}

/// Handle DELETE /tasks/:id - Remove a task
pub async fn delete_task_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ApiResult<TaskResponse> {
    let task = state.delete_task(id)?;
    let message = format!("\"{}\" has been removed from your tasks.", task.text);
    Ok(Json(TaskResponse::new(message, task)))
}

/// Handle GET /status - Return current timer and dashboard status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let timer = state.get_timer()?;
    let dashboard = state.get_dashboard()?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer,
        focus_mode: dashboard.focus_mode,
        tasks: dashboard.task_stats(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
