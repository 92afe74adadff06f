//! Error types for loggo
//!
//! Only construction-time failures are visible to callers. Steady-state
//! emission failures stay inside the dispatcher (see [`crate::sinks::SinkError`]).

use thiserror::Error;

/// Main error type for loggo operations
#[derive(Error, Debug)]
pub enum LoggoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigFileMissing(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    /// Invalid durable target path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// I/O errors (opening the durable target, creating directories)
    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    /// TOML parsing errors
    #[error("TOML parsing error: {source}")]
    TomlError {
        #[from]
        source: toml::de::Error,
    },

    /// Foreign producer bridge errors
    #[error("Bridge error: {0}")]
    BridgeError(String),
}

/// Result type alias for loggo operations
pub type Result<T> = std::result::Result<T, LoggoError>;

impl LoggoError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create a new invalid path error
    pub fn invalid_path<S: Into<String>>(msg: S) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a new bridge error
    pub fn bridge<S: Into<String>>(msg: S) -> Self {
        Self::BridgeError(msg.into())
    }

    /// Whether this error happened while opening the durable target
    pub fn is_construction_failure(&self) -> bool {
        matches!(self, Self::IoError { .. } | Self::InvalidPath(_))
    }
}
