//! Call types for the token ledger
//!
//! A `CallRequest` is what reaches the ledger boundary: a caller identity,
//! an attached native-currency value and the requested operation. Raw value
//! sends are resolved here, once, into an explicit `Intake` variant so the
//! core never inspects payload shape.

use super::account::{AccountId, Amount};
use super::event::{IntakePath, LedgerEvent, Seq};

/// State-changing operations accepted by the ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    /// Administrator-only supply issuance
    Issue { to: AccountId, amount: Amount },

    /// Token transfer from the caller
    Transfer { to: AccountId, amount: Amount },

    /// Explicit payable deposit
    Deposit,

    /// Raw value send to the ledger's address, with or without a payload
    Send { payload: Vec<u8> },
}

impl Call {
    /// Short operation name used in logs and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Call::Issue { .. } => "issue",
            Call::Transfer { .. } => "transfer",
            Call::Deposit => "deposit",
            Call::Send { payload } if payload.is_empty() => "receive",
            Call::Send { .. } => "fallback",
        }
    }

    /// Whether this call accepts attached native-currency value
    pub fn is_payable(&self) -> bool {
        matches!(self, Call::Deposit | Call::Send { .. })
    }
}

/// A call as submitted by an external caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRequest {
    /// Implicit caller identity
    pub caller: AccountId,

    /// Implicit attached native-currency value (zero unless depositing)
    pub value: Amount,

    /// Requested operation
    pub call: Call,
}

impl CallRequest {
    pub fn new(caller: AccountId, value: Amount, call: Call) -> Self {
        CallRequest {
            caller,
            value,
            call,
        }
    }
}

/// Escrow intake variant, resolved at the boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intake {
    /// Explicit `deposit()` call
    Deposit,
    /// Value with an empty payload
    PlainReceipt,
    /// Value with a non-empty payload; the payload is inert
    DataReceipt(Vec<u8>),
}

impl Intake {
    /// Resolve a raw value send by payload shape
    pub fn from_payload(payload: Vec<u8>) -> Self {
        if payload.is_empty() {
            Intake::PlainReceipt
        } else {
            Intake::DataReceipt(payload)
        }
    }

    /// The audit path this intake is recorded under
    pub fn path(&self) -> IntakePath {
        match self {
            Intake::Deposit => IntakePath::Deposit,
            Intake::PlainReceipt => IntakePath::Receive,
            Intake::DataReceipt(_) => IntakePath::Fallback,
        }
    }
}

/// Success acknowledgment of a committed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Sequence number assigned to the call
    pub seq: Seq,

    /// Events the call appended to the log, in order
    pub events: Vec<LedgerEvent>,
}
