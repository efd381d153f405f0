//! Error types for compliance-sentinel.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all sentinel operations.
#[derive(Error, Debug)]
pub enum SentinelError {
    /// I/O operation failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Configuration error with message.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A finding failed construction-time validation.
    ///
    /// The engine assumes validated input; this is the only gate.
    #[error("Invalid finding '{id}': {reason}")]
    InvalidFinding { id: String, reason: String },

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SentinelError {
    /// Create a read error for a path.
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for sentinel operations.
pub type Result<T> = std::result::Result<T, SentinelError>;
