//! Shared Types Module
//!
//! Ledger entities and cross-chain packet types shared across the callbacks.

pub mod callbacks;
pub mod host_zone;
pub mod packet;
pub mod records;

// Re-exports for convenience
pub use callbacks::{CallbackKind, DelegateCallback, RedemptionCallback, SplitDelegation};
pub use host_zone::{HostZone, HostZoneError, Validator};
pub use packet::{Acknowledgement, AcknowledgementError, AcknowledgementResult, Packet};
pub use records::{DepositRecord, DepositRecordStatus, UserRedemptionRecord};
