//! Error types for the board document engine

use thiserror::Error;

/// Result type for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Errors that can occur while editing, loading or saving a board document
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Task not found among live tasks
    #[error("task not found: {id}")]
    TaskNotFound { id: String },

    /// Column not found
    #[error("column not found: {id}")]
    ColumnNotFound { id: String },

    /// Board not found in the store
    #[error("board not found: {id}")]
    BoardNotFound { id: String },

    /// Index-based reorder outside the list
    #[error("index {index} out of bounds for list of length {len}")]
    InvalidIndex { index: usize, len: usize },

    /// Parent/subtask assignment that would break the task graph
    #[error("cannot relate task {task} to {candidate}: {reason}")]
    InvalidRelationship {
        task: String,
        candidate: String,
        reason: String,
    },

    /// Invalid field value
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Parse error at an import boundary
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Opaque failure reported by a persistence collaborator
    #[error("storage error: {message}")]
    Storage { message: String },

    /// Lock is held by another process
    #[error("lock busy - another save in progress")]
    LockBusy,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be extracted
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl From<figment::Error> for DocumentError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl DocumentError {
    /// Create a task-not-found error
    pub fn task_not_found(id: impl ToString) -> Self {
        Self::TaskNotFound { id: id.to_string() }
    }

    /// Create a column-not-found error
    pub fn column_not_found(id: impl ToString) -> Self {
        Self::ColumnNotFound { id: id.to_string() }
    }

    /// Create an invalid relationship error
    pub fn invalid_relationship(
        task: impl ToString,
        candidate: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidRelationship {
            task: task.to_string(),
            candidate: candidate.to_string(),
            reason: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Check if this is one of the not-found kinds
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TaskNotFound { .. } | Self::ColumnNotFound { .. } | Self::BoardNotFound { .. }
        )
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::LockBusy)
    }
}
