//! ICA Callbacks
//!
//! Reacts to acknowledgements of packets sent over interchain accounts.
//!
//! # Flow
//!
//! ```text
//!  transport ── ack(id, packet, result?, args) ──▶ CallbackRegistry::dispatch
//!                                                      │
//!                        ┌─────────────────────────────┴───────────────┐
//!                        ▼                                             ▼
//!              DelegateCallbackHandler                    RedemptionCallbackHandler
//!     credit validators + staked_bal per split,      result: remove user redemption record
//!     then remove the deposit record                 nil:    mark record claimable
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use stakeibc_callbacks::{CallbackRegistry, Keeper, MemoryLedgerStore};
//!
//! let registry = CallbackRegistry::with_default_callbacks();
//! let mut store = MemoryLedgerStore::new();
//! let mut keeper = Keeper::new(&mut store);
//! registry.dispatch("delegate", &mut keeper, &packet, ack.as_ref(), &args)?;
//! ```

pub mod delegate;
pub mod error;
pub mod redemption;
pub mod registry;

use crate::keeper::Keeper;
use crate::types::{AcknowledgementResult, Packet};

// Re-exports
pub use delegate::DelegateCallbackHandler;
pub use error::{CallbackError, CallbackResult};
pub use redemption::RedemptionCallbackHandler;
pub use registry::CallbackRegistry;

/// A handler invoked when the acknowledgement for one of its packets arrives.
///
/// `ack` is `None` when the host chain reported failure or the acknowledgement
/// was not a result envelope. A handler must leave each entity it touches
/// either fully updated or untouched before returning an error.
pub trait CallbackHandler: Send + Sync {
    fn process(
        &self,
        keeper: &mut Keeper<'_>,
        packet: &Packet,
        ack: Option<&AcknowledgementResult>,
        args: &[u8],
    ) -> CallbackResult;
}
