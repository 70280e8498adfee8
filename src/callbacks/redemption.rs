//! Redemption Callback
//!
//! Settles a user redemption record once the host chain reports the outcome
//! of the transfer back to the user.

use tracing::{error, info, warn};

use super::error::{CallbackError, CallbackResult};
use super::CallbackHandler;
use crate::keeper::Keeper;
use crate::types::{AcknowledgementResult, Packet};

/// Handler registered under `"redemption"`
#[derive(Debug, Clone, Copy, Default)]
pub struct RedemptionCallbackHandler;

impl CallbackHandler for RedemptionCallbackHandler {
    fn process(
        &self,
        keeper: &mut Keeper<'_>,
        packet: &Packet,
        ack: Option<&AcknowledgementResult>,
        args: &[u8],
    ) -> CallbackResult {
        // TODO: cross-check the host MsgSend (sender, receiver, amount) in the ack
        // against the record before settling it.
        info!(
            target: "stakeibc::redemption",
            packet = %packet.correlation_id(),
            ack = ack.is_some(),
            args = %hex::encode(args),
            "RedemptionCallback executing"
        );

        let redemption_callback = keeper.unmarshal_redemption_callback_args(args)?;
        let record_id = redemption_callback.user_redemption_record_id;

        let mut record = keeper.get_user_redemption_record(record_id)?.ok_or_else(|| {
            error!(target: "stakeibc::redemption", record_id, "user redemption record not found");
            CallbackError::RecordNotFound(record_id)
        })?;

        if ack.is_none() {
            // transaction on the host chain failed, let the user reclaim
            record.mark_claimable();
            keeper.set_user_redemption_record(&record)?;
            warn!(target: "stakeibc::redemption", record_id, "ack is nil, record marked claimable");
            return Err(CallbackError::RemoteExecutionFailed);
        }

        keeper.remove_user_redemption_record(record_id)?;
        info!(target: "stakeibc::redemption", record_id, amount = record.amount, "redemption settled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{LedgerStore, MemoryLedgerStore, MockLedgerStore};
    use crate::types::{RedemptionCallback, UserRedemptionRecord};

    fn setup() -> MemoryLedgerStore {
        let mut store = MemoryLedgerStore::new();
        store
            .set_user_redemption_record(&UserRedemptionRecord::new(4, "stride1user", "cosmos1user", 2_500, "GAIA"))
            .unwrap();
        store
    }

    fn args(id: u64) -> Vec<u8> {
        borsh::to_vec(&RedemptionCallback { user_redemption_record_id: id }).unwrap()
    }

    fn run(store: &mut dyn LedgerStore, ack: Option<&AcknowledgementResult>, args: &[u8]) -> CallbackResult {
        let mut keeper = Keeper::new(store);
        RedemptionCallbackHandler.process(&mut keeper, &Packet::new("icacontroller-GAIA.REDEMPTION", "channel-2", 8), ack, args)
    }

    #[test]
    fn test_success_removes_record() {
        let mut store = setup();

        run(&mut store, Some(&AcknowledgementResult::default()), &args(4)).unwrap();

        assert!(store.get_user_redemption_record(4).unwrap().is_none());
    }

    #[test]
    fn test_failure_marks_claimable() {
        let mut store = setup();

        let err = run(&mut store, None, &args(4)).unwrap_err();

        assert!(matches!(err, CallbackError::RemoteExecutionFailed));
        let record = store.get_user_redemption_record(4).unwrap().unwrap();
        assert!(record.is_claimable);
        assert_eq!(record.amount, 2_500);
    }

    #[test]
    fn test_missing_record_is_fatal() {
        let mut store = setup();

        for ack in [None, Some(AcknowledgementResult::default())] {
            let err = run(&mut store, ack.as_ref(), &args(99)).unwrap_err();
            assert!(matches!(err, CallbackError::RecordNotFound(99)));
        }

        assert!(store.get_user_redemption_record(99).unwrap().is_none());
        assert_eq!(store.stats().unwrap().user_redemption_records, 1);
        assert_eq!(store.stats().unwrap().claimable_redemptions, 0);
    }

    #[test]
    fn test_undecodable_args() {
        let mut store = setup();

        let err = run(&mut store, None, &[1]).unwrap_err();

        assert!(matches!(err, CallbackError::Codec(_)));
        assert!(!store.get_user_redemption_record(4).unwrap().unwrap().is_claimable);
    }

    #[test]
    fn test_missing_record_writes_nothing() {
        let mut store = MockLedgerStore::new();
        store.expect_get_user_redemption_record().returning(|_| Ok(None));
        store.expect_set_user_redemption_record().never();
        store.expect_remove_user_redemption_record().never();

        let err = run(&mut store, None, &args(1)).unwrap_err();

        assert!(matches!(err, CallbackError::RecordNotFound(1)));
    }
}
