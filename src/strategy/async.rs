//! Asynchronous batch replay strategy
//!
//! This module implements replay on a tokio runtime: the call script is read
//! in batches with csv-async and every call is submitted through a
//! `SharedLedger`, the same handle concurrent async callers would use.
//!
//! # Ordering
//!
//! Calls are submitted one at a time in file order. A transfer may depend on
//! an issue earlier in the script, so the strategy never reorders or
//! parallelizes calls; the final ledger equals the synchronous strategy's.

use crate::core::{Ledger, SharedLedger};
use crate::io::async_reader::AsyncReader;
use crate::strategy::{ProcessingStrategy, ReplayOutcome, ReplayStats};
use crate::types::LedgerError;
use std::path::Path;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::{debug, warn};

/// Configuration for async batch reading
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of script rows read per batch
    pub batch_size: usize,

    /// Number of tokio worker threads
    pub worker_threads: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            worker_threads: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a BatchConfig, falling back to defaults for zero values
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Rows per batch; 0 falls back to the default
    /// * `worker_threads` - Runtime worker threads; 0 falls back to the CPU count
    pub fn new(batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                batch_size,
                default = default.batch_size,
                "invalid batch size, using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let worker_threads = if worker_threads == 0 {
            warn!(
                worker_threads,
                default = default.worker_threads,
                "invalid worker thread count, using default"
            );
            default.worker_threads
        } else {
            worker_threads
        };

        Self {
            batch_size,
            worker_threads,
        }
    }
}

/// Async replay strategy
///
/// Owns its own multi-threaded tokio runtime for the duration of a replay.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    async fn replay_async(
        &self,
        ledger: Ledger,
        input_path: &Path,
    ) -> Result<ReplayOutcome, LedgerError> {
        let file = tokio::fs::File::open(input_path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LedgerError::FileNotFound {
                    path: input_path.display().to_string(),
                },
                _ => LedgerError::from(e),
            })?;

        // csv-async reads futures-io sources
        let mut reader = AsyncReader::new(file.compat());
        let shared = SharedLedger::new(ledger);
        let mut stats = ReplayStats::default();

        loop {
            let batch = reader.read_batch(self.config.batch_size).await;
            if batch.is_empty() {
                break;
            }
            debug!(rows = batch.len(), "replaying batch");

            for row in batch {
                match row {
                    Ok(request) => {
                        let outcome = shared.process(request).await.map(|receipt| receipt.seq);
                        stats.record_outcome(outcome);
                    }
                    Err(e) => stats.record_malformed(&e),
                }
            }
        }

        let ledger = shared.try_into_inner().ok_or_else(|| LedgerError::IoError {
            message: "ledger still shared after replay".to_string(),
        })?;

        Ok(ReplayOutcome { ledger, stats })
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn replay(&self, ledger: Ledger, input_path: &Path) -> Result<ReplayOutcome, LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .enable_all()
            .build()
            .map_err(|e| LedgerError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(self.replay_async(ledger, input_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LedgerConfig;
    use crate::strategy::SyncProcessingStrategy;
    use crate::types::AccountId;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ADMIN: &str = "0x00000000000000000000000000000000000000ad";
    const A: &str = "0x000000000000000000000000000000000000000a";
    const B: &str = "0x000000000000000000000000000000000000000b";
    const C: &str = "0x000000000000000000000000000000000000000c";

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn ledger() -> Ledger {
        Ledger::new(LedgerConfig::new(AccountId::from_low_u64(0xad))).unwrap()
    }

    #[test]
    fn test_batch_config_zero_values_fall_back() {
        let config = BatchConfig::new(0, 0);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.worker_threads, num_cpus::get());

        let config = BatchConfig::new(50, 2);
        assert_eq!(config.batch_size, 50);
        assert_eq!(config.worker_threads, 2);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default());
        let result = strategy.replay(ledger(), Path::new("nonexistent.csv"));
        assert!(matches!(result, Err(LedgerError::FileNotFound { .. })));
    }

    // Dependent calls split across batches must still apply in order
    #[rstest]
    #[case::one_row_batches(1)]
    #[case::two_row_batches(2)]
    #[case::single_batch(1000)]
    fn test_async_strategy_matches_sync(#[case] batch_size: usize) {
        let content = format!(
            "caller,op,to,amount,value,data\n\
            {ADMIN},issue,{A},10000,,\n\
            {A},transfer,{B},1000,,\n\
            {B},transfer,{C},500,,\n\
            {B},transfer,{A},2000,,\n\
            {C},send,,,0.01ether,0x12345678\n\
            {C},deposit,,,5,\n\
            {C},issue,{C},1,,\n\
            {A},transfer,{C},not-a-number,,\n"
        );
        let file = create_temp_csv(&content);

        let expected = SyncProcessingStrategy.replay(ledger(), file.path()).unwrap();
        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(batch_size, 2));
        let outcome = strategy.replay(ledger(), file.path()).unwrap();

        assert_eq!(outcome.stats, expected.stats);
        assert_eq!(outcome.ledger.snapshot(), expected.ledger.snapshot());
        assert_eq!(outcome.stats.applied, 5);
        assert_eq!(outcome.stats.rejected, 2);
        assert_eq!(outcome.stats.malformed, 1);
        assert_eq!(outcome.ledger.balance_of(&AccountId::from_low_u64(0xc)), 495);
    }
}
