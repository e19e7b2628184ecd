//! Core traits for reading ledger state
//!
//! This module defines the read-only view shared by a live `Ledger` and a
//! persisted `LedgerSnapshot`, so reports can be rendered from either.

use crate::types::{AccountId, Amount, LedgerEvent, Seq};

/// Read-only access to ledger state
///
/// Implementations never mutate state; every method is a pure query.
pub trait LedgerView {
    /// The immutable administrator identity
    fn administrator(&self) -> AccountId;

    /// Current total supply
    fn total_supply(&self) -> Amount;

    /// Balance of any account, zero if never credited
    fn balance_of(&self, account: &AccountId) -> Amount;

    /// Balance of the calling account
    fn my_balance(&self, caller: &AccountId) -> Amount {
        self.balance_of(caller)
    }

    /// Native-currency value held in escrow
    fn escrow_balance(&self) -> Amount;

    /// Sequence number of the last committed call
    fn latest_seq(&self) -> Seq;

    /// Cumulative fees credited to the administrator
    fn fees_routed(&self) -> Amount;

    /// Cumulative fees destroyed
    fn fees_burned(&self) -> Amount;

    /// All balance table entries sorted by account
    fn accounts(&self) -> Vec<(AccountId, Amount)>;

    /// The full event log in commit order
    fn event_log(&self) -> &[LedgerEvent];
}
