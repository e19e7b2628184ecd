//! Synchronous replay strategy
//!
//! Reads the call script with the iterator-based `SyncReader` and applies
//! each call to the ledger directly, on the calling thread.

use crate::core::Ledger;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{ProcessingStrategy, ReplayOutcome, ReplayStats};
use crate::types::LedgerError;
use std::path::Path;

/// Single-threaded replay over a streaming CSV reader
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn replay(&self, mut ledger: Ledger, input_path: &Path) -> Result<ReplayOutcome, LedgerError> {
        let reader = SyncReader::new(input_path)?;
        let mut stats = ReplayStats::default();

        for row in reader {
            stats.record(row, &mut ledger);
        }

        Ok(ReplayOutcome { ledger, stats })
    }
}
