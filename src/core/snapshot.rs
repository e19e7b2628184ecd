//! Persisted ledger state
//!
//! A `LedgerSnapshot` is the complete externally observable state of a
//! ledger: administrator, supply, balances, escrow and the event log. It
//! serializes with serde (JSON in the CLI) and can be turned back into a
//! live ledger with `Ledger::restore`.

use crate::core::traits::LedgerView;
use crate::types::{AccountId, Amount, LedgerError, LedgerEvent, Seq};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Serializable copy of a ledger's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub administrator: AccountId,
    pub total_supply: Amount,
    pub balances: BTreeMap<AccountId, Amount>,
    pub escrow_balance: Amount,
    pub fees_routed: Amount,
    pub fees_burned: Amount,
    pub latest_seq: Seq,
    pub event_log: Vec<LedgerEvent>,
}

impl LedgerSnapshot {
    /// Check that total supply equals the sum of all balances
    ///
    /// # Errors
    ///
    /// Returns `InconsistentSnapshot` if the sum differs from the supply or
    /// does not fit in an `Amount`.
    pub fn check_conservation(&self) -> Result<(), LedgerError> {
        let sum = self
            .balances
            .values()
            .try_fold(0 as Amount, |acc, &balance| acc.checked_add(balance));

        match sum {
            Some(balance_sum) if balance_sum == self.total_supply => Ok(()),
            Some(balance_sum) => Err(LedgerError::InconsistentSnapshot {
                total_supply: self.total_supply,
                balance_sum,
            }),
            None => Err(LedgerError::InconsistentSnapshot {
                total_supply: self.total_supply,
                balance_sum: Amount::MAX,
            }),
        }
    }

    /// Write the snapshot as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<(), LedgerError> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }

    /// Read a snapshot from a JSON file
    pub fn read_json(path: &Path) -> Result<Self, LedgerError> {
        let file = File::open(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => LedgerError::FileNotFound {
                path: path.display().to_string(),
            },
            _ => LedgerError::from(e),
        })?;
        let snapshot = serde_json::from_reader(BufReader::new(file))?;
        Ok(snapshot)
    }
}

impl LedgerView for LedgerSnapshot {
    fn administrator(&self) -> AccountId {
        self.administrator
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn escrow_balance(&self) -> Amount {
        self.escrow_balance
    }

    fn latest_seq(&self) -> Seq {
        self.latest_seq
    }

    fn fees_routed(&self) -> Amount {
        self.fees_routed
    }

    fn fees_burned(&self) -> Amount {
        self.fees_burned
    }

    fn accounts(&self) -> Vec<(AccountId, Amount)> {
        self.balances.iter().map(|(&id, &bal)| (id, bal)).collect()
    }

    fn event_log(&self) -> &[LedgerEvent] {
        &self.event_log
    }
}
