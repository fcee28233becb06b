//! Centralized error types for TaskSync core state.

use thiserror::Error;

/// Main error type for client-side state operations.
#[derive(Error, Debug)]
pub enum TaskSyncError {
    #[error("Duplicate task id from server: {0}")]
    DuplicateTask(String),

    #[error("Not signed in")]
    NoSession,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for TaskSync core operations.
pub type TaskSyncResult<T> = Result<T, TaskSyncError>;

impl TaskSyncError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }
}
