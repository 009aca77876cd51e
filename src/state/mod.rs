//! State management module
//!
//! This module contains the interval timer state machine, the dashboard
//! tools and the shared application state that wraps them.

pub mod timer_config;
pub mod timer_state;
pub mod interval_timer;
pub mod dashboard;
pub mod app_state;

// Re-export main types
pub use timer_config::{ConfigDraft, ConfigError, ConfigField, FieldError, TimerConfig};
pub use timer_state::{format_remaining, Phase, PhaseChange, TimerState};
pub use interval_timer::{IntervalTimer, PhaseNotifier, TimerSnapshot};
pub use dashboard::{Dashboard, Task, TaskStats, NOTE_MAX_CHARS};
pub use app_state::{AppState, BroadcastNotifier, SharedTimer};
