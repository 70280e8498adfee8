//! Callback Argument Codec
//!
//! Callback arguments travel as opaque bytes attached to the outbound packet
//! and come back unchanged with the acknowledgement. They are borsh-encoded,
//! which is deterministic and round-trips exactly.

use thiserror::Error;

use crate::types::{CallbackKind, DelegateCallback, RedemptionCallback};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("failed to encode {kind} callback args: {source}")]
    Encode {
        kind: CallbackKind,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {kind} callback args: {source}")]
    Decode {
        kind: CallbackKind,
        #[source]
        source: std::io::Error,
    },

    #[error("expected {expected} callback args, got {actual}")]
    KindMismatch {
        expected: CallbackKind,
        actual: CallbackKind,
    },
}

/// Decoded callback arguments, one variant per callback kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackArgs {
    Delegate(DelegateCallback),
    Redemption(RedemptionCallback),
}

impl CallbackArgs {
    /// Decode `bytes` as the argument structure of `kind`.
    ///
    /// Trailing bytes are rejected.
    pub fn decode(kind: CallbackKind, bytes: &[u8]) -> Result<Self, CodecError> {
        let map_err = |source| CodecError::Decode { kind, source };
        match kind {
            CallbackKind::Delegate => borsh::from_slice(bytes).map(Self::Delegate).map_err(map_err),
            CallbackKind::Redemption => borsh::from_slice(bytes).map(Self::Redemption).map_err(map_err),
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let kind = self.kind();
        let encoded = match self {
            Self::Delegate(args) => borsh::to_vec(args),
            Self::Redemption(args) => borsh::to_vec(args),
        };
        encoded.map_err(|source| CodecError::Encode { kind, source })
    }

    pub fn kind(&self) -> CallbackKind {
        match self {
            Self::Delegate(_) => CallbackKind::Delegate,
            Self::Redemption(_) => CallbackKind::Redemption,
        }
    }

    pub fn into_delegate(self) -> Result<DelegateCallback, CodecError> {
        match self {
            Self::Delegate(args) => Ok(args),
            other => Err(other.mismatch(CallbackKind::Delegate)),
        }
    }

    pub fn into_redemption(self) -> Result<RedemptionCallback, CodecError> {
        match self {
            Self::Redemption(args) => Ok(args),
            other => Err(other.mismatch(CallbackKind::Redemption)),
        }
    }

    fn mismatch(&self, expected: CallbackKind) -> CodecError {
        CodecError::KindMismatch {
            expected,
            actual: self.kind(),
        }
    }
}

impl From<DelegateCallback> for CallbackArgs {
    fn from(args: DelegateCallback) -> Self {
        Self::Delegate(args)
    }
}

impl From<RedemptionCallback> for CallbackArgs {
    fn from(args: RedemptionCallback) -> Self {
        Self::Redemption(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SplitDelegation;

    #[test]
    fn test_delegate_args_survive_transport() {
        let args = CallbackArgs::from(DelegateCallback {
            host_zone_id: "GAIA".to_string(),
            deposit_record_id: u64::MAX,
            split_delegations: vec![SplitDelegation::new("val1", 10), SplitDelegation::new("val1", 0)],
        });

        let bytes = args.encode().unwrap();
        assert_eq!(CallbackArgs::decode(CallbackKind::Delegate, &bytes).unwrap(), args);
    }

    #[test]
    fn test_decode_rejects_wrong_shape() {
        let bytes = CallbackArgs::from(RedemptionCallback { user_redemption_record_id: 5 })
            .encode()
            .unwrap();

        // An 8-byte redemption payload is not a valid delegate payload
        let err = CallbackArgs::decode(CallbackKind::Delegate, &bytes).unwrap_err();
        assert!(matches!(err, CodecError::Decode { kind: CallbackKind::Delegate, .. }));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = CallbackArgs::from(RedemptionCallback { user_redemption_record_id: 5 })
            .encode()
            .unwrap();
        bytes.push(0);

        assert!(CallbackArgs::decode(CallbackKind::Redemption, &bytes).is_err());
        assert!(CallbackArgs::decode(CallbackKind::Redemption, &[]).is_err());
    }

    #[test]
    fn test_into_variant_checks_kind() {
        let args = CallbackArgs::from(RedemptionCallback { user_redemption_record_id: 8 });

        let err = args.clone().into_delegate().unwrap_err();
        assert!(matches!(
            err,
            CodecError::KindMismatch {
                expected: CallbackKind::Delegate,
                actual: CallbackKind::Redemption,
            }
        ));
        assert_eq!(args.into_redemption().unwrap().user_redemption_record_id, 8);
    }
}
