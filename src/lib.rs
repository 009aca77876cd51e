//! Focus Timer - A state-managed HTTP server for a Pomodoro interval timer
//!
//! This library provides the work / short break / long break interval timer
//! state machine, the session-local focus dashboard (focus mode, quick note,
//! task list) and an HTTP surface that lets a presentation layer drive both.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::AppError;
pub use state::{AppState, IntervalTimer, Phase, PhaseChange, TimerConfig, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
