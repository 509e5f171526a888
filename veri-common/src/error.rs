//! Error types for the VeriCore services.

use thiserror::Error;

/// Result type alias using the VeriCore error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for VeriCore services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing credentials, bad endpoint). Fatal at
    /// startup, never produced per request.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request. Always user-correctable; carries the
    /// offending constraint.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Oracle failure. Internal only: the scoring engine converts it into a
    /// degraded result, it never crosses the service boundary as a failure.
    #[error("Oracle failure: {0}")]
    Oracle(String),

    /// Timeout error
    #[error("Operation timed out")]
    Timeout,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check if this is a validation error.
    pub const fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Check if this is a configuration error.
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Get HTTP status code for this error.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            Self::NotFound(_) => 404,
            Self::Timeout => 408,
            _ => 500,
        }
    }
}
