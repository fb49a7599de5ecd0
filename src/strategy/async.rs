//! Asynchronous batch processing strategy
//!
//! Runs a command script in batches on a multi-threaded tokio runtime, with
//! client-based partitioning inside each batch.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading)
//!     ├── BatchProcessor (client partitioning + tokio tasks)
//!     └── AsyncBank (DashMap-backed clients and accounts)
//! ```
//!
//! # Ordering
//!
//! - Batches run one after another, so a client's commands keep script order
//!   even when they span several batches
//! - Within a batch, each client's commands run in order in their own task
//! - Different clients run in parallel

use crate::config::LedgerConfig;
use crate::core::r#async::{AsyncBank, BatchProcessor};
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use crate::strategy::{log_outcome, ProcessingStrategy};
use crate::types::LedgerError;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Configuration for batch processing
#[derive(Clone, Debug)]
pub struct BatchConfig {
    /// Number of commands per batch
    pub batch_size: usize,
    /// Worker threads of the runtime
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults, with a warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            warn!(
                fallback = default.batch_size,
                "invalid batch_size (0), using default"
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            warn!(
                fallback = default.max_concurrent_batches,
                "invalid max_concurrent_batches (0), using default"
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
///
/// Produces the same account output as the synchronous strategy for any
/// script. Registrations run in script order, so account numbers match a
/// sequential run; transactions keep per-client order, and clients never
/// touch each other's accounts.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    ledger_config: LedgerConfig,
    config: BatchConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(ledger_config: LedgerConfig, config: BatchConfig) -> Self {
        Self {
            ledger_config,
            config,
        }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<(), LedgerError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches)
            .build()
            .map_err(|e| LedgerError::IoError {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(async {
            let bank = Arc::new(AsyncBank::new(self.ledger_config.clone()));
            let processor = BatchProcessor::new(Arc::clone(&bank));

            let file = tokio::fs::File::open(input_path)
                .await
                .map_err(|e| LedgerError::IoError {
                    message: format!("Failed to open file '{}': {}", input_path.display(), e),
                })?;

            // csv-async reads through the futures io traits
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            let mut batches = 0usize;
            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }
                batches += 1;

                for processed in processor.process_batch(batch).await {
                    if let Ok(outcome) = &processed.result {
                        log_outcome(outcome);
                    }
                }
            }
            debug!(batches, "script finished");

            write_accounts_csv(&bank.list_accounts(), output)
        })
    }
}
