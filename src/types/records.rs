//! Record Types
//!
//! Deposit records hold funds waiting to be delegated on a host zone.
//! User redemption records hold withdrawals owed to users:
//! pending → claimable (remote failure) | removed (remote success)

use serde::{Deserialize, Serialize};

/// Where a deposit record sits in the sweep → delegate pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositRecordStatus {
    /// Funds collected on the controller chain
    Transfer,
    /// Funds on the host zone, delegation instruction in flight
    Stake,
}

impl Default for DepositRecordStatus {
    fn default() -> Self {
        Self::Transfer
    }
}

impl std::fmt::Display for DepositRecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Transfer => "transfer",
            Self::Stake => "stake",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for DepositRecordStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "transfer" => Ok(Self::Transfer),
            "stake" => Ok(Self::Stake),
            _ => Err(format!("unknown deposit record status: {}", s)),
        }
    }
}

/// Funds earmarked for delegation on a host zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub id: u64,
    /// Chain ID of the host zone that receives the delegation
    pub host_zone_id: String,
    pub amount: u64,
    pub denom: String,
    pub status: DepositRecordStatus,
    /// Epoch in which the deposit was swept
    pub epoch_number: u64,
}

impl DepositRecord {
    pub fn new(id: u64, host_zone_id: impl Into<String>, amount: u64, denom: impl Into<String>) -> Self {
        Self {
            id,
            host_zone_id: host_zone_id.into(),
            amount,
            denom: denom.into(),
            status: DepositRecordStatus::default(),
            epoch_number: 0,
        }
    }
}

/// A pending withdrawal owed to a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRedemptionRecord {
    pub id: u64,
    /// Controller-chain address that requested the redemption
    pub sender: String,
    /// Host-chain address receiving the native tokens
    pub receiver: String,
    pub amount: u64,
    pub denom: String,
    pub host_zone_id: String,
    pub epoch_number: u64,
    /// Set when the host transfer failed and the user may reclaim
    pub is_claimable: bool,
}

impl UserRedemptionRecord {
    pub fn new(
        id: u64,
        sender: impl Into<String>,
        receiver: impl Into<String>,
        amount: u64,
        host_zone_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            sender: sender.into(),
            receiver: receiver.into(),
            amount,
            denom: String::new(),
            host_zone_id: host_zone_id.into(),
            epoch_number: 0,
            is_claimable: false,
        }
    }

    /// Mark the record as claimable after a failed host transfer
    pub fn mark_claimable(&mut self) {
        self.is_claimable = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deposit_status_parsing() {
        assert_eq!("stake".parse::<DepositRecordStatus>(), Ok(DepositRecordStatus::Stake));
        assert_eq!(DepositRecordStatus::Transfer.to_string(), "transfer");
        assert!("staking".parse::<DepositRecordStatus>().is_err());
    }

    #[test]
    fn test_redemption_record_starts_pending() {
        let mut record = UserRedemptionRecord::new(7, "stride1user", "cosmos1user", 1_000, "GAIA");
        assert!(!record.is_claimable);

        record.mark_claimable();
        assert!(record.is_claimable);
    }
}
