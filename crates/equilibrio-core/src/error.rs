//! Core error types for equilibrio-core.
//!
//! Only configuration, storage and validation failures are errors here.
//! Nothing in the reminder engine itself can fail: malformed input is skipped
//! for the current cycle and retried on the next one.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for equilibrio-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the local key-value store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// The write would push the store past its byte quota.
    #[error("Storage quota exceeded writing '{key}': {required} bytes needed, quota is {quota}")]
    QuotaExceeded {
        key: String,
        required: usize,
        quota: usize,
    },

    /// No usable data directory
    #[error("Cannot prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A time-of-day string that is not `H:MM` / `HH:MM` within range
    #[error("Invalid time of day '{0}': expected HH:MM")]
    InvalidClockTime(String),

    #[error("Unknown routine: {0}")]
    UnknownRoutine(String),

    #[error("Unknown block '{block_id}' in routine '{routine_id}'")]
    UnknownBlock {
        routine_id: String,
        block_id: String,
    },

    #[error("Unknown subtask '{subtask_id}' in block '{block_id}'")]
    UnknownSubtask {
        block_id: String,
        subtask_id: String,
    },

    #[error("Routine already exists: {0}")]
    DuplicateRoutine(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Failures of presentation side effects.
///
/// These are always caught by the dispatcher and never interrupt a tick.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    /// System notifications are not permitted.
    #[error("Notification permission denied")]
    PermissionDenied,

    /// The runtime refused to play audio.
    #[error("Audio playback rejected: {0}")]
    AudioRejected(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl CoreError {
    /// Whether the failure was caused by the storage quota.
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, CoreError::Storage(StorageError::QuotaExceeded { .. }))
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
