//! Core error types for earntrack-core.
//!
//! Engine failures never abort a session. `InvalidSalary` is surfaced to the
//! user as a rejected start; malformed stored settings and bad query
//! parameters are reported as [`ValidationError`] diagnostics and otherwise
//! ignored.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for earntrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Durable storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Clipboard and other IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Session lifecycle errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    /// Start was requested with a missing, non-positive or non-finite salary.
    #[error("Please enter a valid salary amount (got {salary})")]
    InvalidSalary { salary: f64 },
}

/// Durable key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,

    /// Data directory could not be prepared
    #[error("Data directory unavailable: {0}")]
    DataDir(#[from] std::io::Error),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A query-string parameter was present but could not be used.
    #[error("Invalid URL parameter '{name}': {value:?}")]
    InvalidUrlParameter { name: String, value: String },

    /// The stored settings blob failed to parse.
    #[error("Malformed stored settings: {0}")]
    MalformedStoredSettings(String),

    /// Invalid value for a settings field
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Unknown settings field name
    #[error("Unknown settings field: {0}")]
    UnknownField(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}
