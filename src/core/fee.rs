//! Transfer fee computation
//!
//! Fees are a fixed proportion of the transferred amount, expressed in
//! basis points and rounded down. The computation splits the amount around
//! the basis-point denominator so the intermediate product never exceeds
//! the amount itself: `fee(u128::MAX)` is defined for every valid rate.

use crate::types::{Amount, LedgerError};

/// Denominator for basis-point rates
pub const BPS_DENOMINATOR: Amount = 10_000;

/// Highest accepted fee rate (100%)
pub const MAX_FEE_BPS: u16 = 10_000;

/// Compute the fee owed on a transfer of `amount` at `bps` basis points
///
/// Equal to `floor(amount * bps / 10_000)`.
///
/// # Errors
///
/// Returns `Overflow` if an intermediate step would exceed `u128`, which
/// can only happen for rates above `MAX_FEE_BPS`.
pub fn calculate_transfer_fee(amount: Amount, bps: u16) -> Result<Amount, LedgerError> {
    let bps = Amount::from(bps);
    let whole = amount / BPS_DENOMINATOR;
    let rest = amount % BPS_DENOMINATOR;

    whole
        .checked_mul(bps)
        .and_then(|fee| {
            rest.checked_mul(bps)
                .map(|r| r / BPS_DENOMINATOR)
                .and_then(|r| fee.checked_add(r))
        })
        .ok_or_else(|| LedgerError::overflow("calculate_transfer_fee"))
}

/// A ledger's fixed fee rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    bps: u16,
}

impl FeeSchedule {
    pub fn new(bps: u16) -> Self {
        FeeSchedule { bps }
    }

    pub fn bps(&self) -> u16 {
        self.bps
    }

    /// Fee owed on a transfer of `amount`
    pub fn fee_for(&self, amount: Amount) -> Result<Amount, LedgerError> {
        calculate_transfer_fee(amount, self.bps)
    }
}
