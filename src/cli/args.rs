use crate::core::{DepositPolicy, FeePolicy, LedgerConfig, DEFAULT_FEE_BPS};
use crate::strategy::BatchConfig;
use crate::types::{AccountId, Amount};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay token ledger call scripts and report the resulting state
#[derive(Parser, Debug)]
#[command(name = "token-ledger")]
#[command(about = "Replay token ledger call scripts and report the resulting state", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing call records
    #[arg(value_name = "INPUT", help = "Path to the call-script CSV file")]
    pub input_file: PathBuf,

    /// Administrator identity, fixed at creation
    #[arg(
        long = "admin",
        value_name = "ADDRESS",
        help = "Administrator address (0x-prefixed, 40 hex digits)"
    )]
    pub admin: AccountId,

    /// Supply minted to the administrator at genesis
    #[arg(
        long = "initial-supply",
        value_name = "AMOUNT",
        default_value_t = 0,
        help = "Tokens minted to the administrator at genesis"
    )]
    pub initial_supply: Amount,

    /// Transfer fee rate
    #[arg(
        long = "fee-bps",
        value_name = "BPS",
        default_value_t = DEFAULT_FEE_BPS,
        help = "Transfer fee in basis points (100 = 1%)"
    )]
    pub fee_bps: u16,

    /// Where transfer fees go
    #[arg(
        long = "fee-policy",
        value_name = "POLICY",
        default_value = "route",
        help = "Fee destination: 'route' credits the administrator, 'burn' destroys the fee"
    )]
    pub fee_policy: FeePolicyArg,

    /// Token credit for deposits
    #[arg(
        long = "deposit-rate",
        value_name = "TOKENS",
        help = "Tokens minted per wei deposited (default: deposits credit no tokens)"
    )]
    pub deposit_rate: Option<Amount>,

    /// Processing strategy used to replay the script
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Replay strategy: 'sync' for synchronous or 'async' for batched async reading"
    )]
    pub strategy: StrategyType,

    /// Number of rows per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of script rows per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Number of runtime worker threads (async mode only)
    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Number of tokio worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    /// Report written to stdout after replay
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "balances",
        help = "Report to print: 'balances', 'events' or 'summary'"
    )]
    pub report: ReportKind,

    /// Ledger state to start from instead of genesis
    #[arg(
        long = "restore",
        value_name = "PATH",
        help = "Start from a JSON snapshot written by --snapshot"
    )]
    pub restore: Option<PathBuf>,

    /// Where to write the final ledger state
    #[arg(
        long = "snapshot",
        value_name = "PATH",
        help = "Write the final ledger state as JSON"
    )]
    pub snapshot: Option<PathBuf>,
}

/// Available replay strategies
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

/// Available output reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// `account,balance` rows sorted by account
    Balances,
    /// The full event log
    Events,
    /// Headline figures as `key,value` rows
    Summary,
}

/// Fee destination as accepted on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FeePolicyArg {
    Route,
    Burn,
}

impl From<FeePolicyArg> for FeePolicy {
    fn from(arg: FeePolicyArg) -> Self {
        match arg {
            FeePolicyArg::Route => FeePolicy::Route,
            FeePolicyArg::Burn => FeePolicy::Burn,
        }
    }
}

impl CliArgs {
    /// Build the ledger configuration from CLI arguments
    ///
    /// The result is not validated here; `Ledger::new` rejects invalid
    /// combinations.
    pub fn to_ledger_config(&self) -> LedgerConfig {
        let deposit_policy = match self.deposit_rate {
            Some(tokens_per_unit) => DepositPolicy::CreditAtRate { tokens_per_unit },
            None => DepositPolicy::NoTokenCredit,
        };

        LedgerConfig::new(self.admin)
            .with_initial_supply(self.initial_supply)
            .with_fee_bps(self.fee_bps)
            .with_fee_policy(self.fee_policy.into())
            .with_deposit_policy(deposit_policy)
    }

    /// Create a BatchConfig from CLI arguments
    ///
    /// Uses the provided values, falling back to defaults for missing or
    /// zero ones.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.workers.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.workers.unwrap_or(default.worker_threads),
            )
        } else {
            BatchConfig::default()
        }
    }
}
