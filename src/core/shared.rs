//! Shared ledger handle for concurrent async callers
//!
//! This module provides the `SharedLedger` struct, a cloneable handle that
//! lets many async tasks submit calls to, and read from, one `Ledger`.
//!
//! # Design
//!
//! ```text
//! SharedLedger (Clone)
//!     └── Arc<RwLock<Ledger>>
//! ```
//!
//! # Thread Safety
//!
//! State-changing calls take the write lock for their full duration, so
//! every call is applied to the whole ledger atomically and calls are
//! totally ordered. Readers take the read lock and always observe a
//! committed state; they never see a transfer's debit without its credit.
//! Multi-account transitions rule out per-account locking here.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::core::ledger::Ledger;
use crate::core::snapshot::LedgerSnapshot;
use crate::types::{AccountId, Amount, CallRequest, LedgerError, Receipt, Seq};

/// Cloneable handle to a ledger shared across async tasks
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    /// Wrap a ledger for shared access
    pub fn new(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    /// Apply a call request under the write lock
    ///
    /// # Returns
    ///
    /// The receipt of the committed call, or the error that rejected it.
    /// A rejected call leaves the ledger unchanged.
    pub async fn process(&self, request: CallRequest) -> Result<Receipt, LedgerError> {
        let mut ledger = self.inner.write().await;
        ledger.process(request)
    }

    /// Run a read-only closure against a committed state
    pub async fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        let ledger = self.inner.read().await;
        f(&ledger)
    }

    pub async fn balance_of(&self, account: AccountId) -> Amount {
        self.read(|ledger| ledger.balance_of(&account)).await
    }

    pub async fn total_supply(&self) -> Amount {
        self.read(Ledger::total_supply).await
    }

    pub async fn escrow_balance(&self) -> Amount {
        self.read(Ledger::escrow_balance).await
    }

    pub async fn latest_seq(&self) -> Seq {
        self.read(Ledger::latest_seq).await
    }

    /// Consistent copy of the full ledger state
    pub async fn snapshot(&self) -> LedgerSnapshot {
        self.read(Ledger::snapshot).await
    }

    /// Take the ledger back out once every other handle is gone
    ///
    /// Returns `None` while other clones of this handle are still alive.
    pub fn try_into_inner(self) -> Option<Ledger> {
        Arc::try_unwrap(self.inner).ok().map(RwLock::into_inner)
    }
}
