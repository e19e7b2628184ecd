//! Ledger configuration
//!
//! Everything fixed at ledger creation: the administrator, the opening
//! supply, the transfer fee rate and where fees go, and whether escrow
//! deposits credit tokens.

use crate::core::fee::{FeeSchedule, MAX_FEE_BPS};
use crate::types::{AccountId, Amount, LedgerError};
use serde::{Deserialize, Serialize};

/// Default transfer fee: 1% (100 basis points)
pub const DEFAULT_FEE_BPS: u16 = 100;

/// Where the fee portion of a transfer goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeePolicy {
    /// Credit the fee to the administrator; total supply is conserved
    #[default]
    Route,
    /// Destroy the fee; total supply shrinks by the fee
    Burn,
}

/// Whether escrow deposits credit tokens to the depositor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositPolicy {
    /// Deposits only fund escrow
    #[default]
    NoTokenCredit,
    /// Deposits mint `value * tokens_per_unit` tokens to the depositor
    CreditAtRate { tokens_per_unit: Amount },
}

/// Immutable configuration of a ledger instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// The single account allowed to issue supply
    pub administrator: AccountId,

    /// Supply minted to the administrator at genesis
    pub initial_supply: Amount,

    /// Transfer fee in basis points (0..=10_000)
    pub fee_bps: u16,

    pub fee_policy: FeePolicy,

    pub deposit_policy: DepositPolicy,
}

impl LedgerConfig {
    /// Configuration with default policies for the given administrator
    pub fn new(administrator: AccountId) -> Self {
        LedgerConfig {
            administrator,
            initial_supply: 0,
            fee_bps: DEFAULT_FEE_BPS,
            fee_policy: FeePolicy::default(),
            deposit_policy: DepositPolicy::default(),
        }
    }

    pub fn with_initial_supply(mut self, initial_supply: Amount) -> Self {
        self.initial_supply = initial_supply;
        self
    }

    pub fn with_fee_bps(mut self, fee_bps: u16) -> Self {
        self.fee_bps = fee_bps;
        self
    }

    pub fn with_fee_policy(mut self, fee_policy: FeePolicy) -> Self {
        self.fee_policy = fee_policy;
        self
    }

    pub fn with_deposit_policy(mut self, deposit_policy: DepositPolicy) -> Self {
        self.deposit_policy = deposit_policy;
        self
    }

    /// Check the configuration can back a ledger
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if:
    /// - The administrator is the sentinel account
    /// - The fee rate exceeds 10_000 basis points
    /// - The deposit credit rate is zero
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.administrator.is_zero() {
            return Err(LedgerError::invalid_config(
                "administrator must not be the zero account",
            ));
        }

        if self.fee_bps > MAX_FEE_BPS {
            return Err(LedgerError::invalid_config(format!(
                "fee rate {} bps exceeds maximum {} bps",
                self.fee_bps, MAX_FEE_BPS
            )));
        }

        if let DepositPolicy::CreditAtRate { tokens_per_unit: 0 } = self.deposit_policy {
            return Err(LedgerError::invalid_config(
                "deposit credit rate must be positive",
            ));
        }

        Ok(())
    }

    /// Fee schedule derived from the configured rate
    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule::new(self.fee_bps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ADMIN: AccountId = AccountId::from_low_u64(1);

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::new(ADMIN);
        assert_eq!(config.initial_supply, 0);
        assert_eq!(config.fee_bps, DEFAULT_FEE_BPS);
        assert_eq!(config.fee_policy, FeePolicy::Route);
        assert_eq!(config.deposit_policy, DepositPolicy::NoTokenCredit);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::zero_admin(LedgerConfig::new(AccountId::ZERO))]
    #[case::fee_too_high(LedgerConfig::new(ADMIN).with_fee_bps(10_001))]
    #[case::zero_deposit_rate(
        LedgerConfig::new(ADMIN).with_deposit_policy(DepositPolicy::CreditAtRate { tokens_per_unit: 0 })
    )]
    fn test_validate_rejects(#[case] config: LedgerConfig) {
        assert!(matches!(
            config.validate(),
            Err(LedgerError::InvalidConfig { .. })
        ));
    }

    #[rstest]
    #[case::no_fee(0)]
    #[case::full_fee(10_000)]
    fn test_validate_accepts_fee_bounds(#[case] bps: u16) {
        assert!(LedgerConfig::new(ADMIN).with_fee_bps(bps).validate().is_ok());
    }
}
