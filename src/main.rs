//! Bank Ledger CLI
//!
//! Runs the interactive menu, or a CSV command script when one is given.
//!
//! # Usage
//!
//! ```bash
//! cargo run                                      # interactive menu
//! cargo run -- script.csv > accounts.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 script.csv > accounts.csv
//! cargo run -- --checking-limit 1000 --max-withdrawals 5 --log-level info script.csv
//! ```
//!
//! Logs go to stderr; `RUST_LOG` overrides `--log-level`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, I/O failure)

use rust_bank_ledger::cli::{self, Menu};
use rust_bank_ledger::core::Bank;
use rust_bank_ledger::strategy;
use std::io;
use std::process;
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::parse_args();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let ledger_config = args.to_ledger_config();

    let result = match &args.input_file {
        Some(input_file) => {
            let batch_config = if matches!(args.strategy, cli::StrategyType::Async) {
                Some(args.to_batch_config())
            } else {
                None
            };
            let strategy = strategy::create_strategy(args.strategy, ledger_config, batch_config);

            let mut output = io::stdout();
            strategy.process(input_file, &mut output)
        }
        None => {
            let stdin = io::stdin();
            let mut menu = Menu::new(stdin.lock(), io::stdout(), Bank::new(ledger_config));
            menu.run()
        }
    };

    if let Err(e) = result {
        error!(error = %e, "ledger failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
