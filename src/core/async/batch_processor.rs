//! Batch processing with client-based partitioning
//!
//! This module provides the `BatchProcessor` struct, which runs batches of
//! ledger commands concurrently while keeping every client's commands in their
//! script order.
//!
//! # Design
//!
//! Registrations (`new_client`, `new_account`) are barriers. They run one at a
//! time, in script order, after every command before them has finished, so
//! account numbers are handed out exactly as a sequential run would.
//!
//! The transactions between two barriers are partitioned by tax ID. Each
//! partition runs sequentially in its own tokio task against the shared
//! `AsyncBank`; partitions run in parallel. A client can only touch its own
//! accounts, so the order between partitions cannot change any balance.

use std::collections::HashMap;
use std::sync::Arc;

use super::AsyncBank;
use crate::core::traits::Ledger;
use crate::types::{CommandOutcome, LedgerCommand, LedgerError, TaxId};
use tracing::{error, warn};

/// Result of running a single command
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The command that was run
    pub command: LedgerCommand,

    /// What it produced
    pub result: Result<CommandOutcome, LedgerError>,
}

/// Batch processor with client-based partitioning
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    bank: Arc<AsyncBank>,
}

impl BatchProcessor {
    pub fn new(bank: Arc<AsyncBank>) -> Self {
        Self { bank }
    }

    /// Partition a batch of commands by tax ID
    ///
    /// Each command lands in exactly one partition, and every partition keeps
    /// the relative order its commands had in the batch.
    pub fn partition_by_client(
        &self,
        batch: Vec<LedgerCommand>,
    ) -> HashMap<TaxId, Vec<LedgerCommand>> {
        let mut client_batches: HashMap<TaxId, Vec<LedgerCommand>> = HashMap::new();

        for command in batch {
            client_batches
                .entry(command.tax_id().clone())
                .or_default()
                .push(command);
        }

        client_batches
    }

    /// Run one client's commands in order
    ///
    /// Failures are logged and captured; they don't stop the remaining
    /// commands.
    pub async fn process_client_commands(
        &self,
        commands: Vec<LedgerCommand>,
    ) -> Vec<ProcessingResult> {
        let mut ledger: &AsyncBank = &self.bank;
        let mut results = Vec::with_capacity(commands.len());

        for command in commands {
            results.push(run_command(&mut ledger, command));
        }

        results
    }

    /// Run a batch and wait for all of it
    ///
    /// Registrations run in script order. The transactions between them run
    /// one task per client. Results of a segment are grouped by client; the
    /// order between clients is unspecified.
    pub async fn process_batch(&self, batch: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        let mut ledger: &AsyncBank = &self.bank;
        let mut results = Vec::with_capacity(batch.len());
        let mut pending = Vec::new();

        for command in batch {
            if command.is_registration() {
                results.extend(self.process_segment(std::mem::take(&mut pending)).await);
                results.push(run_command(&mut ledger, command));
            } else {
                pending.push(command);
            }
        }

        results.extend(self.process_segment(pending).await);
        results
    }

    /// Run commands that don't register anything, one task per client
    async fn process_segment(&self, segment: Vec<LedgerCommand>) -> Vec<ProcessingResult> {
        if segment.is_empty() {
            return Vec::new();
        }

        let client_batches = self.partition_by_client(segment);

        let mut tasks = Vec::new();
        for (_tax_id, commands) in client_batches {
            let processor = self.clone();
            let task =
                tokio::spawn(async move { processor.process_client_commands(commands).await });
            tasks.push(task);
        }

        let mut results = Vec::new();
        for task in tasks {
            match task.await {
                Ok(client_results) => results.extend(client_results),
                Err(e) => {
                    error!(error = ?e, "client task panicked");
                }
            }
        }

        results
    }
}

fn run_command(ledger: &mut &AsyncBank, command: LedgerCommand) -> ProcessingResult {
    let result = ledger.execute(command.clone());
    if let Err(e) = &result {
        warn!(
            tax_id = %command.tax_id(),
            category = ?e.category(),
            error = %e,
            "command rejected"
        );
    }
    ProcessingResult { command, result }
}
