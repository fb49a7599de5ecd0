//! Concurrent implementations of core components
//!
//! This module provides the thread-safe ledger and the batch processor that
//! drives it from many tokio tasks at once.
//!
//! # Architecture
//!
//! - **AsyncBank**: `DashMap`-backed ledger with one lock per account
//! - **BatchProcessor**: partitions commands by client and runs the
//!   partitions in parallel
//!
//! # Thread Safety
//!
//! - Operations on different accounts proceed in parallel
//! - Operations on the same account are serialized, validation included
//! - No global locks

pub mod bank;
pub mod batch_processor;

pub use bank::AsyncBank;
pub use batch_processor::{BatchProcessor, ProcessingResult};
