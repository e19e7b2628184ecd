//! Balance table module
//!
//! This module provides the `BalanceTable` struct which maintains the token
//! balance of every account that has ever been credited.
//!
//! The BalanceTable is responsible for:
//! - Creating entries lazily on first credit (entries are never removed)
//! - Applying multi-account postings atomically with checked arithmetic
//! - Providing sorted balance listings for reports and snapshots

use crate::types::{AccountId, Amount, LedgerError};
use std::collections::HashMap;

/// A single leg of a balance change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posting {
    /// Add `amount` to the account
    Credit(AccountId, Amount),
    /// Remove `amount` from the account
    Debit(AccountId, Amount),
}

/// Maps accounts to token balances
///
/// Accounts that were never credited have an implicit zero balance and no
/// entry. A zero balance left behind by debits stays in the table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceTable {
    balances: HashMap<AccountId, Amount>,
}

impl BalanceTable {
    /// Create an empty table
    pub fn new() -> Self {
        BalanceTable {
            balances: HashMap::new(),
        }
    }

    /// Balance of `account`, zero if never credited
    pub fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Whether `account` has an entry
    pub fn contains(&self, account: &AccountId) -> bool {
        self.balances.contains_key(account)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all balances, `None` if it does not fit in an `Amount`
    pub fn checked_sum(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(0 as Amount, |acc, &balance| acc.checked_add(balance))
    }

    /// All entries sorted by account
    ///
    /// Provides deterministic ordering for reports and snapshots.
    pub fn sorted(&self) -> Vec<(AccountId, Amount)> {
        let mut entries: Vec<(AccountId, Amount)> =
            self.balances.iter().map(|(&id, &bal)| (id, bal)).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }

    /// Apply a set of postings atomically
    ///
    /// Every posting is first evaluated against a staged copy of the touched
    /// balances, in order. Only if all of them succeed are the staged values
    /// written back, so a failure leaves the table unchanged.
    ///
    /// # Arguments
    ///
    /// * `operation` - Operation name used in error messages
    /// * `postings` - Credits and debits to apply, in order
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A debit exceeds the account's (staged) balance: `InsufficientBalance`
    /// - A credit would exceed `u128::MAX`: `Overflow`
    pub fn apply(&mut self, operation: &str, postings: &[Posting]) -> Result<(), LedgerError> {
        let mut staged: Vec<(AccountId, Amount)> = Vec::with_capacity(postings.len());

        for posting in postings {
            let account = match posting {
                Posting::Credit(account, _) | Posting::Debit(account, _) => *account,
            };

            let slot = match staged.iter().position(|(id, _)| *id == account) {
                Some(index) => index,
                None => {
                    staged.push((account, self.balance_of(&account)));
                    staged.len() - 1
                }
            };
            let current = staged[slot].1;

            let updated = match *posting {
                Posting::Credit(_, amount) => current
                    .checked_add(amount)
                    .ok_or_else(|| LedgerError::overflow(operation))?,
                Posting::Debit(_, amount) => current.checked_sub(amount).ok_or_else(|| {
                    LedgerError::insufficient_balance(account, current, amount)
                })?,
            };
            staged[slot].1 = updated;
        }

        for (account, balance) in staged {
            self.balances.insert(account, balance);
        }

        Ok(())
    }

    /// Credit `amount` to `account`
    pub fn credit(
        &mut self,
        operation: &str,
        account: AccountId,
        amount: Amount,
    ) -> Result<(), LedgerError> {
        self.apply(operation, &[Posting::Credit(account, amount)])
    }

    /// Replace the table contents wholesale
    pub(crate) fn from_entries(entries: impl IntoIterator<Item = (AccountId, Amount)>) -> Self {
        BalanceTable {
            balances: entries.into_iter().collect(),
        }
    }
}
