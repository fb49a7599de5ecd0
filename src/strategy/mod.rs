//! Processing strategy module for command scripts
//!
//! A strategy is a complete batch pipeline: read a CSV command script, run it
//! against a ledger, then write the final account states. The synchronous and
//! the asynchronous batch implementations are selected at runtime.

use crate::cli::StrategyType;
use crate::config::LedgerConfig;
use crate::types::{CommandOutcome, LedgerError};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for command scripts
pub trait ProcessingStrategy: Send + Sync {
    /// Run the script at `input_path` and write the final accounts to `output`
    ///
    /// # Errors
    ///
    /// Returns an error only for fatal conditions: the script cannot be opened,
    /// the runtime cannot start, or the output cannot be written. Rejected
    /// commands and malformed rows are logged and skipped.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError>;
}

/// Create a processing strategy based on the specified strategy type
///
/// `batch_config` is ignored by the synchronous strategy.
pub fn create_strategy(
    strategy_type: StrategyType,
    ledger_config: LedgerConfig,
    batch_config: Option<BatchConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(ledger_config)),
        StrategyType::Async => Box::new(AsyncProcessingStrategy::new(
            ledger_config,
            batch_config.unwrap_or_default(),
        )),
    }
}

/// Log what a successful command produced
///
/// Statements have no place in the account output, so they are reported here.
pub(crate) fn log_outcome(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Statement(statement) => {
            for entry in &statement.entries {
                info!(
                    account = statement.number,
                    kind = %entry.kind,
                    amount = %entry.amount,
                    at = %entry.formatted_timestamp(),
                    "statement entry"
                );
            }
            info!(
                branch = statement.branch,
                account = statement.number,
                holder = %statement.holder,
                balance = %statement.balance,
                "statement"
            );
        }
        other => debug!(outcome = ?other, "command applied"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_both_strategies_agree() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            b"command,tax_id,account,amount,name,birth_date,address,kind\n\
              new_client,111,,,Ana,,,\n\
              new_client,222,,,Bia,,,\n\
              new_account,111,1,,,,,\n\
              new_account,222,2,,,,,basic\n\
              deposit,111,1,300,,,,\n\
              deposit,222,2,80,,,,\n\
              withdraw,111,1,120.25,,,,\n\
              withdraw,222,2,100,,,,\n",
        )
        .unwrap();
        file.flush().unwrap();

        let mut outputs = Vec::new();
        for strategy_type in [StrategyType::Sync, StrategyType::Async] {
            let strategy = create_strategy(
                strategy_type,
                LedgerConfig::default(),
                Some(BatchConfig::new(3, 2)),
            );
            let mut output = Vec::new();
            strategy.process(file.path(), &mut output).unwrap();
            outputs.push(String::from_utf8(output).unwrap());
        }

        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(
            outputs[0],
            "branch,account,tax_id,kind,balance,withdrawals\n\
             101,1,111,checking,179.75,1\n\
             101,2,222,basic,80.00,0\n"
        );
    }
}
