//! Error types for the token ledger
//!
//! This module defines all error types that can occur while applying calls
//! to the ledger or replaying call scripts. Every ledger error is detected
//! before any state is written, so a returned error always means the call
//! had no effect.
//!
//! # Error Categories
//!
//! - **Call Errors**: Unauthorized caller, invalid amount or recipient, insufficient balance
//! - **Value Errors**: Missing value on payable calls, value on non-payable calls
//! - **Arithmetic Errors**: A step would exceed the representable range
//! - **Configuration Errors**: Invalid ledger configuration or inconsistent snapshot
//! - **Script Errors**: File not found, I/O failures, malformed call records

use super::account::{AccountId, Amount};
use super::event::IntakePath;
use thiserror::Error;

/// Main error type for the token ledger
///
/// Each variant carries the values that triggered it, to aid diagnosis
/// without exposing any state beyond what the call's parameters revealed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Privileged call from a non-administrator caller
    #[error("Unauthorized: {caller} may not call {operation}")]
    Unauthorized {
        /// Account that made the call
        caller: AccountId,
        /// Operation that was refused
        operation: String,
    },

    /// Zero or out-of-range amount where a positive amount is required
    #[error("Invalid amount {amount} for {operation}")]
    InvalidAmount {
        /// The rejected amount
        amount: Amount,
        /// Operation that rejected it
        operation: String,
    },

    /// Transfer or issuance target is the sentinel or otherwise disallowed
    #[error("Invalid recipient {to} for call from {caller}")]
    InvalidRecipient {
        /// Account that made the call
        caller: AccountId,
        /// The rejected recipient
        to: AccountId,
    },

    /// A debit would drive a balance below zero
    #[error("Insufficient balance for {account}: balance {balance}, requested {requested}")]
    InsufficientBalance {
        /// Account that would be debited
        account: AccountId,
        /// Its balance at the time of the call
        balance: Amount,
        /// Requested debit
        requested: Amount,
    },

    /// A value-accepting call received no attached value
    #[error("No value attached to {path} from {caller}")]
    ZeroValue {
        /// Account that made the call
        caller: AccountId,
        /// Intake path that was invoked
        path: IntakePath,
    },

    /// An arithmetic step would exceed the representable integer range
    #[error("Arithmetic overflow in {operation}")]
    Overflow {
        /// Operation that would overflow
        operation: String,
    },

    /// Native-currency value attached to a call that does not accept it
    #[error("{operation} is not payable (attached value {value})")]
    NonPayable {
        /// Operation that was called
        operation: String,
        /// The attached value
        value: Amount,
    },

    /// Ledger configuration rejected at construction
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// What was wrong with it
        message: String,
    },

    /// Snapshot whose supply does not match the sum of its balances
    #[error("Inconsistent snapshot: total supply {total_supply}, sum of balances {balance_sum}")]
    InconsistentSnapshot {
        total_supply: Amount,
        balance_sum: Amount,
    },

    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// A call script record could not be parsed
    #[error("Call script parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },
}

impl From<std::io::Error> for LedgerError {
    fn from(error: std::io::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for LedgerError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        LedgerError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(error: serde_json::Error) -> Self {
        LedgerError::IoError {
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an Unauthorized error
    pub fn unauthorized(caller: AccountId, operation: &str) -> Self {
        LedgerError::Unauthorized {
            caller,
            operation: operation.to_string(),
        }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Amount, operation: &str) -> Self {
        LedgerError::InvalidAmount {
            amount,
            operation: operation.to_string(),
        }
    }

    /// Create an InvalidRecipient error
    pub fn invalid_recipient(caller: AccountId, to: AccountId) -> Self {
        LedgerError::InvalidRecipient { caller, to }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(account: AccountId, balance: Amount, requested: Amount) -> Self {
        LedgerError::InsufficientBalance {
            account,
            balance,
            requested,
        }
    }

    /// Create a ZeroValue error
    pub fn zero_value(caller: AccountId, path: IntakePath) -> Self {
        LedgerError::ZeroValue { caller, path }
    }

    /// Create an Overflow error
    pub fn overflow(operation: &str) -> Self {
        LedgerError::Overflow {
            operation: operation.to_string(),
        }
    }

    /// Create a NonPayable error
    pub fn non_payable(operation: &str, value: Amount) -> Self {
        LedgerError::NonPayable {
            operation: operation.to_string(),
            value,
        }
    }

    /// Create an InvalidConfig error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        LedgerError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a ParseError error
    pub fn parse(line: Option<u64>, message: impl Into<String>) -> Self {
        LedgerError::ParseError {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const ALICE: AccountId = AccountId::from_low_u64(0xa);
    const BOB: AccountId = AccountId::from_low_u64(0xb);

    #[rstest]
    #[case::unauthorized(
        LedgerError::Unauthorized { caller: BOB, operation: "issue".to_string() },
        "Unauthorized: 0x000000000000000000000000000000000000000b may not call issue"
    )]
    #[case::invalid_amount(
        LedgerError::InvalidAmount { amount: 0, operation: "transfer".to_string() },
        "Invalid amount 0 for transfer"
    )]
    #[case::invalid_recipient(
        LedgerError::InvalidRecipient { caller: ALICE, to: AccountId::ZERO },
        "Invalid recipient 0x0000000000000000000000000000000000000000 for call from 0x000000000000000000000000000000000000000a"
    )]
    #[case::insufficient_balance(
        LedgerError::InsufficientBalance { account: BOB, balance: 990, requested: 2000 },
        "Insufficient balance for 0x000000000000000000000000000000000000000b: balance 990, requested 2000"
    )]
    #[case::zero_value(
        LedgerError::ZeroValue { caller: ALICE, path: IntakePath::Deposit },
        "No value attached to deposit from 0x000000000000000000000000000000000000000a"
    )]
    #[case::overflow(
        LedgerError::Overflow { operation: "transfer credit".to_string() },
        "Arithmetic overflow in transfer credit"
    )]
    #[case::non_payable(
        LedgerError::NonPayable { operation: "transfer".to_string(), value: 5 },
        "transfer is not payable (attached value 5)"
    )]
    #[case::parse_error_with_line(
        LedgerError::ParseError { line: Some(42), message: "unknown op".to_string() },
        "Call script parse error at line 42: unknown op"
    )]
    #[case::parse_error_without_line(
        LedgerError::ParseError { line: None, message: "unknown op".to_string() },
        "Call script parse error: unknown op"
    )]
    #[case::file_not_found(
        LedgerError::FileNotFound { path: "calls.csv".to_string() },
        "File not found: calls.csv"
    )]
    fn test_error_display(#[case] error: LedgerError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::unauthorized(
        LedgerError::unauthorized(BOB, "issue"),
        LedgerError::Unauthorized { caller: BOB, operation: "issue".to_string() }
    )]
    #[case::insufficient_balance(
        LedgerError::insufficient_balance(BOB, 1, 2),
        LedgerError::InsufficientBalance { account: BOB, balance: 1, requested: 2 }
    )]
    #[case::overflow(
        LedgerError::overflow("issue"),
        LedgerError::Overflow { operation: "issue".to_string() }
    )]
    #[case::invalid_config(
        LedgerError::invalid_config("fee too high"),
        LedgerError::InvalidConfig { message: "fee too high".to_string() }
    )]
    fn test_helper_functions(#[case] result: LedgerError, #[case] expected: LedgerError) {
        assert_eq!(result, expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: LedgerError = io_error.into();
        assert!(matches!(error, LedgerError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
