//! Storage Layer Module
//!
//! Provides persistence for host zones, deposit records and user redemption
//! records.
//!
//! This module contains:
//! - The `LedgerStore` trait consumed by the callbacks
//! - SQLite implementation for durable state
//! - In-memory implementation for testing

pub mod memory;
pub mod sqlite;
pub mod traits;

// Re-exports for convenience
pub use memory::MemoryLedgerStore;
pub use sqlite::SqliteLedgerStore;
pub use traits::{LedgerStats, LedgerStore, StorageError, StorageResult};

#[cfg(test)]
pub use traits::MockLedgerStore;
