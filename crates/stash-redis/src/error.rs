//! Error types and utilities for Redis operations.

/// Result type for all Redis operations in this crate.
///
/// This is a convenience type alias that defaults to using [`Error`] as the error type.
/// Most functions in this crate return this type for consistent error handling.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for Redis operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Redis transport/connection errors
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),

    /// Invalid configuration
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Generic operation error with context
    #[error("Redis operation failed: {operation} - {details}")]
    Operation { operation: String, details: String },
}

impl Error {
    /// Create an operation error with context
    pub fn operation(op: impl Into<String>, details: impl Into<String>) -> Self {
        Self::Operation {
            operation: op.into(),
            details: details.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Get a user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            Error::Connection(_) => {
                "Connection to Redis failed. Please check your connection.".to_string()
            }
            Error::InvalidConfig { reason } => format!("Configuration error: {}", reason),
            Error::Operation { .. } => "An unexpected error occurred. Please try again.".to_string(),
        }
    }
}

/// Produce a human-readable diagnostic for a transport error.
///
/// Prefers the server-supplied detail and falls back to the full `Display`
/// rendering when no detail is present, so every error shape yields a
/// non-empty message.
pub fn describe_error(err: &redis::RedisError) -> String {
    match err.detail() {
        Some(detail) => detail.to_string(),
        None => err.to_string(),
    }
}
