//! Token Ledger Library
//! # Overview
//!
//! This library provides a single-token ledger with transfer fees,
//! administrator-only issuance, native-currency escrow intake and an
//! append-only event log, plus a call-script replayer with sync and async
//! strategies.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (AccountId, CallRequest, events, errors)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::ledger`] - The state machine applying calls
//!   - [`core::balance_table`] - Balances with atomic multi-posting updates
//!   - [`core::event_log`] - Audit log and range queries
//!   - [`core::shared`] - Lock-guarded handle for concurrent async callers
//! - [`io`] - Call-script parsing and report output
//! - [`strategy`] - Sync and async replay pipelines
//!
//! # Calls
//!
//! - **Issue**: administrator mints new supply to an account
//! - **Transfer**: move tokens, less a basis-point fee
//! - **Deposit**: explicit payable call funding escrow
//! - **Send**: raw value send; an empty payload takes the receive path, any
//!   other payload the fallback path
//!
//! # Invariants
//!
//! - Total supply equals the sum of all balances after every call
//! - No balance ever goes negative or wraps
//! - A failed call leaves state unchanged and consumes no sequence number
//! - Every committed token movement has exactly one transfer record

pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use core::{Ledger, LedgerConfig, LedgerSnapshot, LedgerView, SharedLedger};
pub use io::write_report;
pub use types::{
    AccountId, Amount, Call, CallRequest, DepositRecord, EventKind, IntakePath, LedgerError,
    LedgerEvent, Receipt, Seq, TransferRecord,
};
