//! stakeibc ICA Callbacks
//!
//! Resolves acknowledgements of interchain-account packets sent by the
//! liquid-staking module to its host zones.
//!
//! ## Callbacks
//!
//! 1. **delegate** - credits each validator named in the delegation and the
//!    zone's staked balance, then consumes the funding deposit record
//! 2. **redemption** - settles a user redemption record, or marks it claimable
//!    when the host transfer failed
//!
//! The transport layer owns packets and channels. This crate only reacts once
//! an acknowledgement (or its absence) is known.

pub mod callbacks;
pub mod codec;
pub mod common;
pub mod keeper;
pub mod storage;
pub mod types;

// Re-exports: callbacks
pub use callbacks::{
    CallbackError, CallbackHandler, CallbackRegistry, CallbackResult, DelegateCallbackHandler,
    RedemptionCallbackHandler,
};

// Re-exports: codec and keeper
pub use codec::{CallbackArgs, CodecError};
pub use keeper::Keeper;

// Re-exports: storage
pub use storage::{LedgerStats, LedgerStore, MemoryLedgerStore, SqliteLedgerStore, StorageError};

// Re-exports: types
pub use types::{
    Acknowledgement, AcknowledgementResult, CallbackKind, DelegateCallback, DepositRecord,
    HostZone, Packet, RedemptionCallback, SplitDelegation, UserRedemptionRecord, Validator,
};
