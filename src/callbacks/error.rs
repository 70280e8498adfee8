//! Callback Errors
//!
//! Every failure is returned unchanged through `CallbackRegistry::dispatch`.

use thiserror::Error;

use crate::codec::CodecError;
use crate::storage::StorageError;
use crate::types::HostZoneError;

#[derive(Debug, Error)]
pub enum CallbackError {
    /// The acknowledgement carried no result envelope
    #[error("ack is nil: remote execution failed")]
    RemoteExecutionFailed,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("host zone not found: {0}")]
    HostZoneNotFound(String),

    #[error("user redemption record not found: {0}")]
    RecordNotFound(u64),

    #[error("balance to stake was negative: {amount} (validator {validator})")]
    NegativeAmount { validator: String, amount: i64 },

    #[error("failed to add delegation to validator: {0}")]
    ValidatorDelegationChange(#[from] HostZoneError),

    #[error("no callback registered for id {0:?}")]
    UnknownCallback(String),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl CallbackError {
    /// Stable error code for structured logs
    pub fn error_code(&self) -> &'static str {
        match self {
            CallbackError::RemoteExecutionFailed => "REMOTE_EXECUTION_FAILED",
            CallbackError::Codec(_) => "CODEC_ERROR",
            CallbackError::HostZoneNotFound(_) => "HOST_ZONE_NOT_FOUND",
            CallbackError::RecordNotFound(_) => "RECORD_NOT_FOUND",
            CallbackError::NegativeAmount { .. } => "NEGATIVE_AMOUNT",
            CallbackError::ValidatorDelegationChange(_) => "VALIDATOR_DELEGATION_CHANGE",
            CallbackError::UnknownCallback(_) => "UNKNOWN_CALLBACK",
            CallbackError::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Whether the ledger may have been left for an external retry path.
    ///
    /// Remote failures and storage faults leave the pending record in place.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CallbackError::RemoteExecutionFailed | CallbackError::Storage(_)
        )
    }
}

pub type CallbackResult<T = ()> = Result<T, CallbackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CallbackError::NegativeAmount {
            validator: "val1".to_string(),
            amount: -5,
        };
        assert!(err.to_string().contains("-5"));
        assert_eq!(err.error_code(), "NEGATIVE_AMOUNT");
        assert!(!err.is_retryable());
        assert!(CallbackError::RemoteExecutionFailed.is_retryable());
    }
}
