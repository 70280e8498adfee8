//! In-Memory Storage Implementation
//!
//! Provides in-memory ledger storage for tests and the demo command.
//! Data is lost when the process exits.

use std::collections::BTreeMap;

use super::traits::{LedgerStats, LedgerStore, StorageResult};
use crate::types::{DepositRecord, HostZone, UserRedemptionRecord};

/// In-memory ledger store
///
/// Ordered maps keep iteration deterministic across runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedgerStore {
    /// Host zones indexed by chain ID
    host_zones: BTreeMap<String, HostZone>,
    deposit_records: BTreeMap<u64, DepositRecord>,
    user_redemption_records: BTreeMap<u64, UserRedemptionRecord>,
}

impl MemoryLedgerStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn get_host_zone(&self, chain_id: &str) -> StorageResult<Option<HostZone>> {
        Ok(self.host_zones.get(chain_id).cloned())
    }

    fn set_host_zone(&mut self, zone: &HostZone) -> StorageResult<()> {
        self.host_zones.insert(zone.chain_id.clone(), zone.clone());
        Ok(())
    }

    fn get_deposit_record(&self, id: u64) -> StorageResult<Option<DepositRecord>> {
        Ok(self.deposit_records.get(&id).cloned())
    }

    fn set_deposit_record(&mut self, record: &DepositRecord) -> StorageResult<()> {
        self.deposit_records.insert(record.id, record.clone());
        Ok(())
    }

    fn remove_deposit_record(&mut self, id: u64) -> StorageResult<bool> {
        Ok(self.deposit_records.remove(&id).is_some())
    }

    fn get_user_redemption_record(&self, id: u64) -> StorageResult<Option<UserRedemptionRecord>> {
        Ok(self.user_redemption_records.get(&id).cloned())
    }

    fn set_user_redemption_record(&mut self, record: &UserRedemptionRecord) -> StorageResult<()> {
        self.user_redemption_records.insert(record.id, record.clone());
        Ok(())
    }

    fn remove_user_redemption_record(&mut self, id: u64) -> StorageResult<bool> {
        Ok(self.user_redemption_records.remove(&id).is_some())
    }

    fn stats(&self) -> StorageResult<LedgerStats> {
        Ok(LedgerStats {
            host_zones: self.host_zones.len() as u64,
            deposit_records: self.deposit_records.len() as u64,
            user_redemption_records: self.user_redemption_records.len() as u64,
            claimable_redemptions: self
                .user_redemption_records
                .values()
                .filter(|r| r.is_claimable)
                .count() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_zone_set_and_get() {
        let mut store = MemoryLedgerStore::new();
        let zone = HostZone::new("GAIA", ["val1"]);

        store.set_host_zone(&zone).unwrap();

        assert_eq!(store.get_host_zone("GAIA").unwrap(), Some(zone));
        assert_eq!(store.get_host_zone("OSMO").unwrap(), None);
    }

    #[test]
    fn test_remove_deposit_record() {
        let mut store = MemoryLedgerStore::new();
        store.set_deposit_record(&DepositRecord::new(1, "GAIA", 100, "uatom")).unwrap();

        assert!(store.remove_deposit_record(1).unwrap());
        assert!(!store.remove_deposit_record(1).unwrap());
        assert!(store.get_deposit_record(1).unwrap().is_none());
    }

    #[test]
    fn test_stats() {
        let mut store = MemoryLedgerStore::new();
        let mut record = UserRedemptionRecord::new(1, "a", "b", 10, "GAIA");
        store.set_user_redemption_record(&record).unwrap();
        record.id = 2;
        record.mark_claimable();
        store.set_user_redemption_record(&record).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.user_redemption_records, 2);
        assert_eq!(stats.claimable_redemptions, 1);
        assert_eq!(stats.host_zones, 0);
    }
}
