//! Core business logic module
//!
//! This module contains the ledger components:
//! - `traits` - the `Ledger` operations shared by every implementation
//! - `directory` - client registry, account book and account selection
//! - `engine` - single-threaded `Bank`
//! - `async` - concurrent `AsyncBank` and batch processing

pub mod r#async;
pub mod directory;
pub mod engine;
pub mod traits;

pub use directory::{select_account, AccountBook, ClientDirectory};
pub use engine::Bank;
pub use r#async::{AsyncBank, BatchProcessor};
pub use traits::Ledger;
