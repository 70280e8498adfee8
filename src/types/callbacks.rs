//! Callback Argument Types
//!
//! Argument structures attached to outbound ICA packets and returned
//! unchanged with their acknowledgement.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// Callback kinds wired by this module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackKind {
    Delegate,
    Redemption,
}

impl CallbackKind {
    pub const ALL: [CallbackKind; 2] = [CallbackKind::Delegate, CallbackKind::Redemption];

    /// Registry identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Delegate => "delegate",
            Self::Redemption => "redemption",
        }
    }
}

impl std::fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CallbackKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delegate" => Ok(Self::Delegate),
            "redemption" => Ok(Self::Redemption),
            _ => Err(format!("unknown callback kind: {}", s)),
        }
    }
}

/// One (validator, amount) pair of a delegation instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct SplitDelegation {
    pub validator: String,
    pub amount: u64,
}

impl SplitDelegation {
    pub fn new(validator: impl Into<String>, amount: u64) -> Self {
        Self {
            validator: validator.into(),
            amount,
        }
    }
}

/// Arguments for the `delegate` callback
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct DelegateCallback {
    pub host_zone_id: String,
    pub deposit_record_id: u64,
    pub split_delegations: Vec<SplitDelegation>,
}

impl DelegateCallback {
    /// Total amount across all split delegations, `None` on overflow
    pub fn total_amount(&self) -> Option<u64> {
        self.split_delegations
            .iter()
            .try_fold(0u64, |acc, split| acc.checked_add(split.amount))
    }
}

/// Arguments for the `redemption` callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct RedemptionCallback {
    pub user_redemption_record_id: u64,
}
