//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{
    error::AppError,
    state::{Dashboard, FieldError, PhaseChange, Phase, Task, TaskStats, TimerConfig, TimerSnapshot, NOTE_MAX_CHARS},
};

/// API response structure for timer endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl TimerResponse {
    /// Create a new API response, with status derived from the running flag
    pub fn new(message: impl Into<String>, timer: TimerSnapshot) -> Self {
        let status = if timer.state.running { "running" } else { "stopped" };
        Self {
            status: status.to_string(),
            message: message.into(),
            timestamp: Utc::now(),
            timer,
        }
    }
}

/// Active timer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigResponse {
    pub config: TimerConfig,
    pub limits: Vec<FieldLimit>,
}

/// Accepted range for a numeric configuration field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldLimit {
    pub field: String,
    pub min: i64,
    pub max: i64,
}

/// Server-sent event payload for a phase transition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseChangeEvent {
    pub new_phase: Phase,
    pub completed_work_sessions: u32,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<PhaseChange> for PhaseChangeEvent {
    fn from(change: PhaseChange) -> Self {
        Self {
            new_phase: change.new_phase,
            completed_work_sessions: change.completed_work_sessions,
            message: change.message().to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Dashboard tools as shown to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub focus_mode: bool,
    pub note: String,
    pub note_length: usize,
    pub note_limit: usize,
    pub tasks: Vec<Task>,
    pub stats: TaskStats,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            focus_mode: dashboard.focus_mode,
            note_length: dashboard.note_len(),
            note_limit: NOTE_MAX_CHARS,
            stats: dashboard.task_stats(),
            note: dashboard.note,
            tasks: dashboard.tasks,
        }
    }
}

/// Response for single-task endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub task: Task,
}

impl TaskResponse {
    pub fn new(message: impl Into<String>, task: Task) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            task,
        }
    }
}

/// Request body carrying free text (notes and tasks)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRequest {
    pub text: String,
}

/// Enhanced status response with timer information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub focus_mode: bool,
    pub tasks: TaskStats,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Error body returned for every failed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = match &self {
            AppError::InvalidConfiguration(_) | AppError::EmptyTask | AppError::NoteTooLong { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::TaskNotFound(_) => StatusCode::NOT_FOUND,
            AppError::LockPoisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if code.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }

        let errors = match &self {
            AppError::InvalidConfiguration(e) => e.errors.clone(),
            _ => Vec::new(),
        };
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.to_string(),
            errors,
        };
        (code, Json(body)).into_response()
    }
}
