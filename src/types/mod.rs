//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account identifiers and amounts
//! - `call`: Call requests, escrow intake variants and receipts
//! - `event`: Audit log records
//! - `error`: Error types for the ledger

pub mod account;
pub mod call;
pub mod error;
pub mod event;

pub use account::{AccountId, Amount, ParseAccountIdError, ACCOUNT_ID_LEN};
pub use call::{Call, CallRequest, Intake, Receipt};
pub use error::LedgerError;
pub use event::{DepositRecord, EventKind, IntakePath, LedgerEvent, Seq, TransferRecord};
