//! Token ledger CLI
//!
//! Replays a call script against a fresh (or restored) ledger and prints a
//! report to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --admin 0x00000000000000000000000000000000000000ad calls.csv > balances.csv
//! cargo run -- --admin 0x...ad --report events calls.csv > events.csv
//! cargo run -- --admin 0x...ad --strategy async --batch-size 500 --workers 4 calls.csv
//! cargo run -- --admin 0x...ad --fee-policy burn --snapshot state.json calls.csv
//! cargo run -- --admin 0x...ad --restore state.json more_calls.csv
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` (for example `RUST_LOG=debug`) to see
//! every committed call. Rejected calls are logged at `warn`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid configuration, file not found, unreadable snapshot, etc.)

use std::process;
use token_ledger::cli;
use token_ledger::core::{Ledger, LedgerSnapshot};
use token_ledger::strategy;
use token_ledger::types::LedgerError;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &cli::CliArgs) -> Result<(), LedgerError> {
    let config = args.to_ledger_config();
    let ledger = match &args.restore {
        Some(path) => {
            info!(path = %path.display(), "restoring ledger snapshot");
            Ledger::restore(config, LedgerSnapshot::read_json(path)?)?
        }
        None => Ledger::new(config)?,
    };

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config)
    };

    let mut output = std::io::stdout();
    let ledger = strategy.process(ledger, &args.input_file, args.report, &mut output)?;

    if let Some(path) = &args.snapshot {
        ledger.snapshot().write_json(path)?;
        info!(path = %path.display(), "ledger snapshot written");
    }

    Ok(())
}
