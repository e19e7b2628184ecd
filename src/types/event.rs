//! Audit event types for the token ledger
//!
//! Every committed call appends zero or more events to the ledger's
//! append-only log. Transfer events cover token movement (including
//! issuance, modelled as a transfer from the sentinel account); deposit
//! events cover native-currency intake into escrow.

use super::account::{AccountId, Amount};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number assigned to each committed state-changing call
///
/// Genesis is sequence 0. Failed calls never consume a sequence number.
pub type Seq = u64;

/// Which intake path accepted a native-currency value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakePath {
    /// Explicit `deposit()` call
    Deposit,
    /// Plain value transfer with an empty payload
    Receive,
    /// Value transfer carrying an unrecognized payload
    Fallback,
}

impl fmt::Display for IntakePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntakePath::Deposit => "deposit",
            IntakePath::Receive => "receive",
            IntakePath::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// Immutable record of a completed token movement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Sequence number of the call that produced this record
    pub seq: Seq,
    /// Source account (sentinel for issuance)
    pub from: AccountId,
    /// Destination account
    pub to: AccountId,
    /// Amount the destination received
    pub value: Amount,
}

/// Immutable record of native-currency value accepted into escrow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRecord {
    pub seq: Seq,
    pub from: AccountId,
    pub value: Amount,
    pub path: IntakePath,
}

/// Kinds of events that can be queried from the log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Transfer,
    Deposit,
}

/// A single entry of the event log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerEvent {
    Transfer(TransferRecord),
    Deposit(DepositRecord),
}

impl LedgerEvent {
    /// Sequence number of the call that appended this event
    pub fn seq(&self) -> Seq {
        match self {
            LedgerEvent::Transfer(record) => record.seq,
            LedgerEvent::Deposit(record) => record.seq,
        }
    }

    /// The kind of this event
    pub fn kind(&self) -> EventKind {
        match self {
            LedgerEvent::Transfer(_) => EventKind::Transfer,
            LedgerEvent::Deposit(_) => EventKind::Deposit,
        }
    }

    /// The transfer record, if this is a transfer event
    pub fn as_transfer(&self) -> Option<&TransferRecord> {
        match self {
            LedgerEvent::Transfer(record) => Some(record),
            LedgerEvent::Deposit(_) => None,
        }
    }

    /// The deposit record, if this is a deposit event
    pub fn as_deposit(&self) -> Option<&DepositRecord> {
        match self {
            LedgerEvent::Deposit(record) => Some(record),
            LedgerEvent::Transfer(_) => None,
        }
    }
}
