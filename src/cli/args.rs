use crate::config::LedgerConfig;
use crate::strategy::BatchConfig;
use crate::types::account::{DEFAULT_CHECKING_LIMIT, DEFAULT_MAX_WITHDRAWALS};
use crate::types::AccountKind;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// In-memory bank ledger: interactive menu or CSV command scripts
#[derive(Parser, Debug)]
#[command(name = "bank-ledger")]
#[command(about = "In-memory bank ledger with checking limits and history", long_about = None)]
pub struct CliArgs {
    /// Command script to run; without it the interactive menu starts
    #[arg(value_name = "INPUT", help = "Path to a CSV command script")]
    pub input_file: Option<PathBuf>,

    /// Processing strategy for scripts
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for synchronous or 'async' for batched parallel"
    )]
    pub strategy: StrategyType,

    /// Number of commands per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of commands per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Maximum number of worker threads (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Per-withdrawal limit of checking accounts
    #[arg(long = "checking-limit", value_name = "AMOUNT", default_value_t = Decimal::from(DEFAULT_CHECKING_LIMIT))]
    pub checking_limit: Decimal,

    /// Withdrawal cap of checking accounts
    #[arg(long = "max-withdrawals", value_name = "COUNT", default_value_t = DEFAULT_MAX_WITHDRAWALS)]
    pub max_withdrawals: u32,

    /// Kind of account opened when none is requested
    #[arg(long = "account-kind", value_name = "KIND", default_value = "checking")]
    pub account_kind: AccountKind,

    /// Log verbosity; `RUST_LOG` takes precedence when set
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "warn")]
    pub log_level: LogLevel,
}

/// Available processing strategies for scripts
#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values use the defaults; zero values fall back with a warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create the LedgerConfig used for new accounts
    pub fn to_ledger_config(&self) -> LedgerConfig {
        LedgerConfig::new(self.account_kind, self.checking_limit, self.max_withdrawals)
    }
}
