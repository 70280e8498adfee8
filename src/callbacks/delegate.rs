//! Delegate Callback
//!
//! Applies the result of a host-chain delegation to the validator ledger and
//! consumes the deposit record that funded it.

use tracing::{debug, error, info};

use super::error::{CallbackError, CallbackResult};
use super::CallbackHandler;
use crate::keeper::Keeper;
use crate::types::{AcknowledgementResult, Packet, SplitDelegation};

/// Handler registered under `"delegate"`
#[derive(Debug, Clone, Copy, Default)]
pub struct DelegateCallbackHandler;

impl CallbackHandler for DelegateCallbackHandler {
    fn process(
        &self,
        keeper: &mut Keeper<'_>,
        packet: &Packet,
        ack: Option<&AcknowledgementResult>,
        args: &[u8],
    ) -> CallbackResult {
        info!(target: "stakeibc::delegate", packet = %packet.correlation_id(), "DelegateCallback executing");

        if ack.is_none() {
            // transaction on the host chain failed, deposit record stays for retry
            error!(target: "stakeibc::delegate", packet = %packet.correlation_id(), "ack is nil");
            return Err(CallbackError::RemoteExecutionFailed);
        }

        let delegate_callback = keeper.unmarshal_delegate_callback_args(args)?;
        info!(
            target: "stakeibc::delegate",
            host_zone = %delegate_callback.host_zone_id,
            deposit_record_id = delegate_callback.deposit_record_id,
            splits = delegate_callback.split_delegations.len(),
            total = ?delegate_callback.total_amount(),
            "DelegateCallback decoded"
        );

        let mut zone = keeper
            .get_host_zone(&delegate_callback.host_zone_id)?
            .ok_or_else(|| CallbackError::HostZoneNotFound(delegate_callback.host_zone_id.clone()))?;

        for split in &delegate_callback.split_delegations {
            let amount = stake_amount(split)?;
            debug!(
                target: "stakeibc::delegate",
                validator = %split.validator,
                amount,
                "incrementing staked balance"
            );

            keeper
                .add_delegation_to_validator(&mut zone, &split.validator, amount)
                .inspect_err(|e| {
                    error!(target: "stakeibc::delegate", error = %e, "failed to add delegation to validator");
                })?;
            keeper.set_host_zone(&zone)?;
        }

        let removed = keeper.remove_deposit_record(delegate_callback.deposit_record_id)?;
        if !removed {
            debug!(
                target: "stakeibc::delegate",
                deposit_record_id = delegate_callback.deposit_record_id,
                "deposit record was already absent"
            );
        }

        Ok(())
    }
}

/// Validate a split amount against the controller ledger's signed width.
///
/// Amounts above `i64::MAX` read back negative and are rejected.
fn stake_amount(split: &SplitDelegation) -> CallbackResult<u64> {
    let signed = split.amount as i64;
    if signed < 0 {
        error!(
            target: "stakeibc::delegate",
            validator = %split.validator,
            amount = signed,
            "balance to stake was negative"
        );
        return Err(CallbackError::NegativeAmount {
            validator: split.validator.clone(),
            amount: signed,
        });
    }
    Ok(signed as u64)
}
