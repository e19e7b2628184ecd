//! Benchmark suite for ledger operations and replay strategies
//!
//! Measures in-memory call throughput and compares the synchronous and
//! asynchronous replay strategies using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```
//!
//! Call scripts are generated into temporary files: the administrator
//! funds a set of holders, then holders transfer among themselves.

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use token_ledger::cli::StrategyType;
use token_ledger::core::{Ledger, LedgerConfig};
use token_ledger::strategy::{create_strategy, BatchConfig};
use token_ledger::types::{AccountId, Call, CallRequest};

const ADMIN: AccountId = AccountId::from_low_u64(0xad);
const HOLDERS: u64 = 64;

fn main() {
    divan::main();
}

fn holder(n: u64) -> AccountId {
    AccountId::from_low_u64(0x1000 + n % HOLDERS)
}

fn funded_ledger() -> Ledger {
    let mut ledger = Ledger::new(LedgerConfig::new(ADMIN)).expect("valid config");
    for n in 0..HOLDERS {
        ledger
            .issue(ADMIN, holder(n), 1_000_000_000)
            .expect("issue failed");
    }
    ledger
}

fn transfer_requests(count: u64) -> Vec<CallRequest> {
    (0..count)
        .map(|n| {
            CallRequest::new(
                holder(n),
                0,
                Call::Transfer {
                    to: holder(n + 1),
                    amount: u128::from(1_000 + n % 97),
                },
            )
        })
        .collect()
}

fn write_script(count: u64) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "caller,op,to,amount,value,data").expect("write failed");
    for n in 0..HOLDERS {
        writeln!(file, "{},issue,{},1000000000,,", ADMIN, holder(n)).expect("write failed");
    }
    for n in 0..count {
        if n % 10 == 0 {
            writeln!(file, "{},send,,,0.001ether,0x12345678", holder(n)).expect("write failed");
        } else {
            writeln!(
                file,
                "{},transfer,{},{},,",
                holder(n),
                holder(n + 1),
                1_000 + n % 97
            )
            .expect("write failed");
        }
    }
    file.flush().expect("Failed to flush temp file");
    file
}

/// Apply transfers directly to an in-memory ledger
#[divan::bench(args = [100, 1_000, 10_000])]
fn process_transfers(bencher: divan::Bencher, count: u64) {
    bencher
        .with_inputs(|| (funded_ledger(), transfer_requests(count)))
        .bench_values(|(mut ledger, requests)| {
            for request in requests {
                ledger.process(request).expect("transfer failed");
            }
            ledger
        });
}

/// Range query over a populated event log
#[divan::bench(args = [1_000, 10_000])]
fn query_transfers(bencher: divan::Bencher, count: u64) {
    let mut ledger = funded_ledger();
    for request in transfer_requests(count) {
        ledger.process(request).expect("transfer failed");
    }
    let from = ledger.latest_seq() / 4;
    let to = ledger.latest_seq() / 2;

    bencher.bench(|| ledger.past_transfers(from, to).count());
}

fn replay(strategy_type: StrategyType, path: &Path) {
    let config = match strategy_type {
        StrategyType::Async => Some(BatchConfig::default()),
        StrategyType::Sync => None,
    };
    let strategy = create_strategy(strategy_type, config);
    let ledger = Ledger::new(LedgerConfig::new(ADMIN)).expect("valid config");

    strategy.replay(ledger, path).expect("Replay failed");
}

/// Replay a generated script with the synchronous strategy
#[divan::bench(args = [1_000, 10_000])]
fn sync_strategy(bencher: divan::Bencher, count: u64) {
    let script = write_script(count);
    bencher.bench(|| replay(StrategyType::Sync, script.path()));
}

/// Replay a generated script with the asynchronous strategy
#[divan::bench(args = [1_000, 10_000])]
fn async_strategy(bencher: divan::Bencher, count: u64) {
    let script = write_script(count);
    bencher.bench(|| replay(StrategyType::Async, script.path()));
}
