//! Error types shared by the state layer and the HTTP API

use thiserror::Error;

use crate::state::ConfigError;

/// Errors surfaced by application commands
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),

    #[error("task text must not be empty")]
    EmptyTask,

    #[error("note is {len} characters, the limit is {max}")]
    NoteTooLong { len: usize, max: usize },

    #[error("no task with id {0}")]
    TaskNotFound(u64),

    #[error("failed to lock {0}")]
    LockPoisoned(&'static str),
}

pub type Result<T> = std::result::Result<T, AppError>;
