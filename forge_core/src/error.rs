//! Error types for the forge_core library.

use crate::TaskCategory;
use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for forge_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Exercise catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// The exercise repository could not answer a query
    #[error("Exercise repository error: {0}")]
    Repository(String),

    /// Toggle addressed a task index that does not exist
    #[error("Task not found: {category} #{index}")]
    TaskNotFound { category: TaskCategory, index: usize },

    /// Rejected task definition (bad name, wrong category)
    #[error("Invalid task: {0}")]
    InvalidTask(String),

    /// Rejected profile field
    #[error("Invalid profile: {0}")]
    InvalidProfile(String),

    /// Progress log entry outside plausible bounds
    #[error("Invalid progress entry: {0}")]
    InvalidEntry(String),

    /// A named option did not match any known value
    #[error("Unknown {field} '{value}'")]
    UnknownValue { field: &'static str, value: String },

    /// State management error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether the caller can recover by correcting its input.
    ///
    /// Everything else maps to a generic server-error condition.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::TaskNotFound { .. }
                | Error::InvalidTask(_)
                | Error::InvalidProfile(_)
                | Error::InvalidEntry(_)
                | Error::UnknownValue { .. }
        )
    }
}
