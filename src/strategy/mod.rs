//! Replay strategy module for call scripts
//!
//! This module defines the Strategy pattern for complete replay pipelines,
//! covering both call-script parsing and ledger processing. Different
//! implementations (synchronous, asynchronous batch) can be selected at
//! runtime and must leave the ledger in the same final state for the same
//! script.

use crate::cli::{ReportKind, StrategyType};
use crate::core::Ledger;
use crate::io::csv_format::write_report;
use crate::types::{CallRequest, LedgerError};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Counters for a single replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayStats {
    /// Calls the ledger committed
    pub applied: u64,
    /// Well-formed calls the ledger rejected
    pub rejected: u64,
    /// Rows that could not be parsed into a call
    pub malformed: u64,
}

impl ReplayStats {
    /// Record the outcome of one script row
    ///
    /// Rejected calls and malformed rows are logged and counted; replay
    /// always continues with the next row.
    pub fn record(&mut self, row: Result<CallRequest, LedgerError>, ledger: &mut Ledger) {
        match row {
            Ok(request) => self.record_outcome(ledger.process(request).map(|receipt| receipt.seq)),
            Err(e) => self.record_malformed(&e),
        }
    }

    pub(crate) fn record_outcome(&mut self, outcome: Result<u64, LedgerError>) {
        match outcome {
            Ok(seq) => {
                debug!(seq, "call applied");
                self.applied += 1;
            }
            Err(e) => {
                warn!(error = %e, "call rejected");
                self.rejected += 1;
            }
        }
    }

    pub(crate) fn record_malformed(&mut self, error: &LedgerError) {
        warn!(error = %error, "skipping malformed row");
        self.malformed += 1;
    }
}

/// Final ledger and counters of a replay run
#[derive(Debug)]
pub struct ReplayOutcome {
    pub ledger: Ledger,
    pub stats: ReplayStats,
}

/// Replay strategy trait for complete call-script pipelines
///
/// Each strategy reads call requests from a CSV script and applies them to
/// the given ledger in file order.
pub trait ProcessingStrategy: Send + Sync {
    /// Replay a call script against a ledger
    ///
    /// # Arguments
    ///
    /// * `ledger` - Starting ledger state
    /// * `input_path` - Path to the call-script CSV file
    ///
    /// # Returns
    ///
    /// * `Ok(ReplayOutcome)` once every row was handled (rejected calls and
    ///   malformed rows are logged and counted, not fatal)
    /// * `Err(LedgerError)` if a fatal error occurred (file not found, I/O
    ///   error, runtime setup failure)
    fn replay(&self, ledger: Ledger, input_path: &Path) -> Result<ReplayOutcome, LedgerError>;

    /// Replay a call script and write the selected report
    ///
    /// Returns the final ledger so the caller can persist it.
    fn process(
        &self,
        ledger: Ledger,
        input_path: &Path,
        report: ReportKind,
        output: &mut dyn Write,
    ) -> Result<Ledger, LedgerError> {
        let ReplayOutcome { ledger, stats } = self.replay(ledger, input_path)?;

        info!(
            applied = stats.applied,
            rejected = stats.rejected,
            malformed = stats.malformed,
            latest_seq = ledger.latest_seq(),
            "replay finished"
        );

        write_report(report, &ledger, output)?;
        Ok(ledger)
    }
}

/// Create a replay strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of strategy to create (Sync or Async)
/// * `config` - Optional configuration for async batch reading (ignored for sync)
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LedgerConfig;
    use crate::types::{AccountId, Call};

    const ADMIN: AccountId = AccountId::from_low_u64(0xad);

    #[test]
    fn test_replay_stats_counts_each_outcome() {
        let mut ledger = Ledger::new(LedgerConfig::new(ADMIN)).unwrap();
        let mut stats = ReplayStats::default();

        let to = AccountId::from_low_u64(1);
        stats.record(
            Ok(CallRequest::new(ADMIN, 0, Call::Issue { to, amount: 5 })),
            &mut ledger,
        );
        stats.record(
            Ok(CallRequest::new(to, 0, Call::Issue { to, amount: 5 })),
            &mut ledger,
        );
        stats.record(Err(LedgerError::parse(Some(4), "bad row")), &mut ledger);

        assert_eq!(
            stats,
            ReplayStats {
                applied: 1,
                rejected: 1,
                malformed: 1
            }
        );
        assert_eq!(ledger.total_supply(), 5);
    }

    #[test]
    fn test_create_strategy_returns_both_kinds() {
        let sync = create_strategy(StrategyType::Sync, None);
        let batched = create_strategy(StrategyType::Async, Some(BatchConfig::new(10, 1)));

        let ledger = || Ledger::new(LedgerConfig::new(ADMIN)).unwrap();
        let missing = Path::new("nonexistent.csv");
        assert!(sync.replay(ledger(), missing).is_err());
        assert!(batched.replay(ledger(), missing).is_err());
    }
}
