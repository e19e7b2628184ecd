//! Core business logic module
//!
//! This module contains the ledger state machine and its components:
//! - `config` - Ledger configuration and fee/deposit policies
//! - `fee` - Transfer fee calculation
//! - `balance_table` - Account balances with atomic multi-posting updates
//! - `event_log` - Append-only audit log and range queries
//! - `ledger` - The state machine applying calls
//! - `shared` - Lock-guarded handle for concurrent async callers
//! - `snapshot` - Serializable ledger state
//! - `traits` - Read-only view shared by ledgers and snapshots

pub mod balance_table;
pub mod config;
pub mod event_log;
pub mod fee;
pub mod ledger;
pub mod shared;
pub mod snapshot;
pub mod traits;

pub use balance_table::{BalanceTable, Posting};
pub use config::{DepositPolicy, FeePolicy, LedgerConfig, DEFAULT_FEE_BPS};
pub use event_log::{EventLog, Events};
pub use fee::{calculate_transfer_fee, FeeSchedule, BPS_DENOMINATOR, MAX_FEE_BPS};
pub use ledger::Ledger;
pub use shared::SharedLedger;
pub use snapshot::LedgerSnapshot;
pub use traits::LedgerView;
