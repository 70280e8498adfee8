//! Common Error Types
//!
//! Root error for the binary and for callers that mix configuration, storage
//! and callback failures.

use thiserror::Error;

use crate::callbacks::CallbackError;
use crate::storage::StorageError;
use crate::types::AcknowledgementError;

/// Root error type for the stakeibc callback processor
#[derive(Debug, Error)]
pub enum StakeIbcError {
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] super::logging::LoggingError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("callback error: {0}")]
    Callback(#[from] CallbackError),

    #[error("acknowledgement error: {0}")]
    Acknowledgement(#[from] AcknowledgementError),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StakeIbcError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        match self {
            StakeIbcError::Callback(err) => err.is_retryable(),
            StakeIbcError::Storage(_) | StakeIbcError::Io(_) => true,
            _ => false,
        }
    }

    /// Get error code for structured output
    pub fn error_code(&self) -> &'static str {
        match self {
            StakeIbcError::Config(_) => "CONFIG_ERROR",
            StakeIbcError::Logging(_) => "LOGGING_ERROR",
            StakeIbcError::Storage(_) => "STORAGE_ERROR",
            StakeIbcError::Callback(err) => err.error_code(),
            StakeIbcError::Acknowledgement(_) => "ACK_ERROR",
            StakeIbcError::Validation(_) => "VALIDATION_ERROR",
            StakeIbcError::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type alias using StakeIbcError
pub type Result<T> = std::result::Result<T, StakeIbcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = StakeIbcError::validation("bad hex");
        assert!(err.to_string().contains("bad hex"));
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_callback_errors_keep_their_code() {
        let err = StakeIbcError::from(CallbackError::RecordNotFound(3));
        assert_eq!(err.error_code(), "RECORD_NOT_FOUND");
        assert!(!err.is_retryable());

        let err = StakeIbcError::from(CallbackError::RemoteExecutionFailed);
        assert!(err.is_retryable());
    }
}
