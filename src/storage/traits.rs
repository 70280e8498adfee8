//! Storage Trait Definitions
//!
//! Defines the ledger store consumed by the callbacks. All calls are
//! synchronous and run inside a single state transition, so implementations
//! need no internal locking beyond what their backend requires.

use serde::Serialize;
use thiserror::Error;

use crate::types::{DepositRecord, HostZone, UserRedemptionRecord};

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Ledger storage interface
///
/// Implementations:
/// - `SqliteLedgerStore` - Durable storage with SQLite
/// - `MemoryLedgerStore` - In-memory storage for tests and demos
#[cfg_attr(test, mockall::automock)]
pub trait LedgerStore {
    /// Get a host zone by chain ID
    fn get_host_zone(&self, chain_id: &str) -> StorageResult<Option<HostZone>>;

    /// Insert or replace a host zone
    fn set_host_zone(&mut self, zone: &HostZone) -> StorageResult<()>;

    /// Get a deposit record by ID
    fn get_deposit_record(&self, id: u64) -> StorageResult<Option<DepositRecord>>;

    /// Insert or replace a deposit record
    fn set_deposit_record(&mut self, record: &DepositRecord) -> StorageResult<()>;

    /// Remove a deposit record, returning whether it existed
    fn remove_deposit_record(&mut self, id: u64) -> StorageResult<bool>;

    /// Get a user redemption record by ID
    fn get_user_redemption_record(&self, id: u64) -> StorageResult<Option<UserRedemptionRecord>>;

    /// Insert or replace a user redemption record
    fn set_user_redemption_record(&mut self, record: &UserRedemptionRecord) -> StorageResult<()>;

    /// Remove a user redemption record, returning whether it existed
    fn remove_user_redemption_record(&mut self, id: u64) -> StorageResult<bool>;

    /// Entity counts for operator output
    fn stats(&self) -> StorageResult<LedgerStats>;
}

/// Entity counts across the ledger
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub host_zones: u64,
    pub deposit_records: u64,
    pub user_redemption_records: u64,
    pub claimable_redemptions: u64,
}

impl std::fmt::Display for LedgerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Ledger: {} host zones | {} deposit records | {} redemption records ({} claimable)",
            self.host_zones, self.deposit_records, self.user_redemption_records, self.claimable_redemptions
        )
    }
}
