//! Synchronous processing strategy
//!
//! Single-threaded pipeline that coordinates the `SyncReader` (CSV input) and
//! a `Bank` (business logic).
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Command execution to `Bank` through the `Ledger` trait
//! - CSV output to `csv_format::write_accounts_csv` (format handling)
//!
//! Rows are streamed one at a time; memory grows with the number of accounts
//! and their histories, never with the script.

use crate::config::LedgerConfig;
use crate::core::{Bank, Ledger};
use crate::io::csv_format::write_accounts_csv;
use crate::io::sync_reader::SyncReader;
use crate::strategy::{log_outcome, ProcessingStrategy};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use rust_bank_ledger::config::LedgerConfig;
/// use rust_bank_ledger::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(LedgerConfig::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("script.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    config: LedgerConfig,
}

impl SyncProcessingStrategy {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let mut bank = Bank::new(self.config.clone());
        let reader = SyncReader::open(input_path)?;

        for result in reader {
            match result {
                Ok(command) => {
                    let tax_id = command.tax_id().clone();
                    match bank.execute(command) {
                        Ok(outcome) => log_outcome(&outcome),
                        Err(e) => warn!(
                            tax_id = %tax_id,
                            category = ?e.category(),
                            error = %e,
                            "command rejected"
                        ),
                    }
                }
                Err(e) => warn!(error = %e, "skipping script row"),
            }
        }

        write_accounts_csv(&bank.list_accounts(), output)
    }
}
