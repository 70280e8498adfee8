//! Host Zone Types
//!
//! A host zone is a remote chain whose validators receive stake delegated on
//! behalf of controller-chain users. The zone tracks the stake held by each
//! validator and the aggregate across all of them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when changing a zone's delegation ledger
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostZoneError {
    #[error("validator {validator} not found on host zone {chain_id}")]
    UnknownValidator { chain_id: String, validator: String },

    #[error("delegation overflow on host zone {chain_id} (validator {validator})")]
    Overflow { chain_id: String, validator: String },
}

/// A validator on a host zone and the stake delegated to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validator {
    /// Validator operator address on the host chain
    pub address: String,
    /// Amount currently delegated to this validator
    pub delegation_amt: u64,
}

impl Validator {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            delegation_amt: 0,
        }
    }
}

/// A remote chain participating in liquid staking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostZone {
    /// Chain ID of the host zone
    pub chain_id: String,
    /// Validator set with per-validator delegations
    pub validators: Vec<Validator>,
    /// Aggregate staked balance, always the sum of `validators[*].delegation_amt`
    pub staked_bal: u64,
}

impl HostZone {
    /// Create an empty host zone with the given validator addresses
    pub fn new<I, S>(chain_id: impl Into<String>, validators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            chain_id: chain_id.into(),
            validators: validators.into_iter().map(Validator::new).collect(),
            staked_bal: 0,
        }
    }

    /// Look up a validator by address
    pub fn validator(&self, address: &str) -> Option<&Validator> {
        self.validators.iter().find(|v| v.address == address)
    }

    /// Credit `amount` to a validator and to the aggregate staked balance.
    ///
    /// Both balances change together or not at all.
    pub fn add_delegation_to_validator(
        &mut self,
        address: &str,
        amount: u64,
    ) -> Result<(), HostZoneError> {
        let staked_bal = self
            .staked_bal
            .checked_add(amount)
            .ok_or_else(|| self.overflow(address))?;

        let chain_id = &self.chain_id;
        let validator = self
            .validators
            .iter_mut()
            .find(|v| v.address == address)
            .ok_or_else(|| HostZoneError::UnknownValidator {
                chain_id: chain_id.clone(),
                validator: address.to_string(),
            })?;

        let delegation_amt = validator
            .delegation_amt
            .checked_add(amount)
            .ok_or_else(|| HostZoneError::Overflow {
                chain_id: chain_id.clone(),
                validator: address.to_string(),
            })?;

        validator.delegation_amt = delegation_amt;
        self.staked_bal = staked_bal;
        Ok(())
    }

    /// Sum of all per-validator delegations
    pub fn total_delegated(&self) -> u128 {
        self.validators
            .iter()
            .map(|v| u128::from(v.delegation_amt))
            .sum()
    }

    /// Whether the aggregate balance matches the validator ledger
    pub fn is_balanced(&self) -> bool {
        u128::from(self.staked_bal) == self.total_delegated()
    }

    fn overflow(&self, address: &str) -> HostZoneError {
        HostZoneError::Overflow {
            chain_id: self.chain_id.clone(),
            validator: address.to_string(),
        }
    }
}
