//! Ledger Keeper
//!
//! The keeper is the ledger-mutating handle handed to every callback. It
//! borrows the store mutably for one state transition, so at most one
//! callback can write to the ledger at a time.

use tracing::{debug, error};

use crate::codec::{CallbackArgs, CodecError};
use crate::storage::{LedgerStore, StorageResult};
use crate::types::{
    CallbackKind, DelegateCallback, HostZone, HostZoneError, RedemptionCallback,
    UserRedemptionRecord,
};

pub struct Keeper<'a> {
    store: &'a mut dyn LedgerStore,
}

impl<'a> Keeper<'a> {
    pub fn new(store: &'a mut dyn LedgerStore) -> Self {
        Self { store }
    }

    // ----------------------------------------------------------------------
    // Host zones
    // ----------------------------------------------------------------------

    pub fn get_host_zone(&self, chain_id: &str) -> StorageResult<Option<HostZone>> {
        self.store.get_host_zone(chain_id)
    }

    pub fn set_host_zone(&mut self, zone: &HostZone) -> StorageResult<()> {
        self.store.set_host_zone(zone)
    }

    /// Credit `amount` to `validator` on `zone` and to the zone's staked
    /// balance. The zone is only changed in memory; callers persist it.
    pub fn add_delegation_to_validator(
        &self,
        zone: &mut HostZone,
        validator: &str,
        amount: u64,
    ) -> Result<(), HostZoneError> {
        zone.add_delegation_to_validator(validator, amount)?;
        debug!(
            target: "stakeibc::keeper",
            host_zone = %zone.chain_id,
            validator,
            amount,
            staked_bal = zone.staked_bal,
            "added delegation to validator"
        );
        Ok(())
    }

    // ----------------------------------------------------------------------
    // Records
    // ----------------------------------------------------------------------

    pub fn remove_deposit_record(&mut self, id: u64) -> StorageResult<bool> {
        self.store.remove_deposit_record(id)
    }

    pub fn get_user_redemption_record(&self, id: u64) -> StorageResult<Option<UserRedemptionRecord>> {
        self.store.get_user_redemption_record(id)
    }

    pub fn set_user_redemption_record(&mut self, record: &UserRedemptionRecord) -> StorageResult<()> {
        self.store.set_user_redemption_record(record)
    }

    pub fn remove_user_redemption_record(&mut self, id: u64) -> StorageResult<bool> {
        self.store.remove_user_redemption_record(id)
    }

    // ----------------------------------------------------------------------
    // Callback args
    // ----------------------------------------------------------------------

    pub fn marshal_delegate_callback_args(&self, args: &DelegateCallback) -> Result<Vec<u8>, CodecError> {
        CallbackArgs::Delegate(args.clone()).encode().inspect_err(|e| {
            error!(target: "stakeibc::keeper", error = %e, "MarshalDelegateCallbackArgs failed");
        })
    }

    pub fn unmarshal_delegate_callback_args(&self, bytes: &[u8]) -> Result<DelegateCallback, CodecError> {
        CallbackArgs::decode(CallbackKind::Delegate, bytes)
            .and_then(CallbackArgs::into_delegate)
            .inspect_err(|e| {
                error!(target: "stakeibc::keeper", error = %e, "UnmarshalDelegateCallbackArgs failed");
            })
    }

    pub fn marshal_redemption_callback_args(&self, args: &RedemptionCallback) -> Result<Vec<u8>, CodecError> {
        CallbackArgs::Redemption(args.clone()).encode().inspect_err(|e| {
            error!(target: "stakeibc::keeper", error = %e, "MarshalRedemptionCallbackArgs failed");
        })
    }

    pub fn unmarshal_redemption_callback_args(&self, bytes: &[u8]) -> Result<RedemptionCallback, CodecError> {
        CallbackArgs::decode(CallbackKind::Redemption, bytes)
            .and_then(CallbackArgs::into_redemption)
            .inspect_err(|e| {
                error!(target: "stakeibc::keeper", error = %e, "UnmarshalRedemptionCallbackArgs failed");
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryLedgerStore;
    use crate::types::SplitDelegation;

    #[test]
    fn test_callback_args_roundtrip_through_keeper() {
        let mut store = MemoryLedgerStore::new();
        let keeper = Keeper::new(&mut store);

        let args = DelegateCallback {
            host_zone_id: "GAIA".to_string(),
            deposit_record_id: 3,
            split_delegations: vec![SplitDelegation::new("val1", 77)],
        };
        let bytes = keeper.marshal_delegate_callback_args(&args).unwrap();
        assert_eq!(keeper.unmarshal_delegate_callback_args(&bytes).unwrap(), args);

        let redemption = RedemptionCallback { user_redemption_record_id: 12 };
        let bytes = keeper.marshal_redemption_callback_args(&redemption).unwrap();
        assert_eq!(keeper.unmarshal_redemption_callback_args(&bytes).unwrap(), redemption);
    }

    #[test]
    fn test_unmarshal_reports_garbage() {
        let mut store = MemoryLedgerStore::new();
        let keeper = Keeper::new(&mut store);

        assert!(keeper.unmarshal_redemption_callback_args(&[1, 2, 3]).is_err());
        assert!(keeper.unmarshal_delegate_callback_args(&[0xff; 4]).is_err());
    }

    #[test]
    fn test_add_delegation_does_not_persist() {
        let mut store = MemoryLedgerStore::new();
        let mut keeper = Keeper::new(&mut store);
        let zone = HostZone::new("GAIA", ["val1"]);
        keeper.set_host_zone(&zone).unwrap();

        let mut working = keeper.get_host_zone("GAIA").unwrap().unwrap();
        keeper.add_delegation_to_validator(&mut working, "val1", 40).unwrap();

        assert_eq!(working.staked_bal, 40);
        assert_eq!(keeper.get_host_zone("GAIA").unwrap().unwrap().staked_bal, 0);
    }
}
