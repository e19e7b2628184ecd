//! Account-related types for the token ledger
//!
//! This module defines the fixed-width account identifier used both as the
//! caller identity of every call and as the key of the balance table, along
//! with the integer width used for token and native-currency amounts.

use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Token or native-currency amount in base units
///
/// Unsigned by construction: no balance, supply or escrow value can go
/// negative, and every arithmetic step on it is checked.
pub type Amount = u128;

/// Width of an account identifier in bytes
pub const ACCOUNT_ID_LEN: usize = 20;

/// Fixed-width account identifier (20-byte address)
///
/// The all-zero identifier is the sentinel account: it never holds a balance
/// and appears as the `from` side of issuance records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId([u8; ACCOUNT_ID_LEN]);

impl AccountId {
    /// The sentinel account ("no account")
    pub const ZERO: AccountId = AccountId([0u8; ACCOUNT_ID_LEN]);

    /// Create an account identifier from raw bytes
    pub const fn new(bytes: [u8; ACCOUNT_ID_LEN]) -> Self {
        AccountId(bytes)
    }

    /// Create an identifier whose trailing bytes hold `n` (big-endian)
    ///
    /// Convenient for tests and fixtures: `from_low_u64(1)` renders as
    /// `0x0000000000000000000000000000000000000001`.
    pub const fn from_low_u64(n: u64) -> Self {
        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        let be = n.to_be_bytes();
        let mut i = 0;
        while i < 8 {
            bytes[ACCOUNT_ID_LEN - 8 + i] = be[i];
            i += 1;
        }
        AccountId(bytes)
    }

    /// Whether this is the sentinel account
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Raw identifier bytes
    pub fn as_bytes(&self) -> &[u8; ACCOUNT_ID_LEN] {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Error returned when parsing an account identifier fails
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid account id '{input}': {reason}")]
pub struct ParseAccountIdError {
    input: String,
    reason: String,
}

impl FromStr for AccountId {
    type Err = ParseAccountIdError;

    /// Parse `0x`-prefixed (or bare) 40-digit hex, case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let fail = |reason: String| ParseAccountIdError {
            input: s.to_string(),
            reason,
        };

        if digits.len() != ACCOUNT_ID_LEN * 2 {
            return Err(fail(format!(
                "expected {} hex digits, got {}",
                ACCOUNT_ID_LEN * 2,
                digits.len()
            )));
        }

        let mut bytes = [0u8; ACCOUNT_ID_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|e| fail(e.to_string()))?;
        Ok(AccountId(bytes))
    }
}

impl Serialize for AccountId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = String::deserialize(deserializer)?;
        encoded.parse().map_err(D::Error::custom)
    }
}
