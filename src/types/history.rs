//! Per-account transaction history
//!
//! An append-only log of the transactions that were successfully applied to
//! one account, in application order.

use super::transaction::{Transaction, TransactionKind};
use chrono::{DateTime, Local};
use rust_decimal::Decimal;

/// Format used when rendering entry timestamps
pub const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// One recorded transaction
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub kind: TransactionKind,
    pub amount: Decimal,
    /// Moment the transaction was recorded
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    /// Timestamp rendered as day-month-year hour:minute:second
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Ordered log of applied transactions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        History {
            entries: Vec::new(),
        }
    }

    /// Append an entry for `transaction`, stamped with the current local time
    pub fn record(&mut self, transaction: &Transaction) {
        self.entries.push(HistoryEntry {
            kind: transaction.kind(),
            amount: transaction.amount(),
            timestamp: Local::now(),
        });
    }

    /// Entries in the order they were recorded
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of withdrawal entries
    pub fn withdrawal_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.kind == TransactionKind::Withdrawal)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_history_is_empty() {
        let history = History::new();
        assert!(history.is_empty());
        assert_eq!(history.len(), 0);
        assert_eq!(history.withdrawal_count(), 0);
    }

    #[test]
    fn test_record_preserves_order() {
        let mut history = History::new();
        history.record(&Transaction::deposit(Decimal::from(200)));
        history.record(&Transaction::withdrawal(Decimal::from(50)));
        history.record(&Transaction::deposit(Decimal::new(1025, 2)));

        let kinds: Vec<_> = history.entries().iter().map(|e| e.kind).collect();
        let amounts: Vec<_> = history.entries().iter().map(|e| e.amount).collect();

        assert_eq!(
            kinds,
            vec![
                TransactionKind::Deposit,
                TransactionKind::Withdrawal,
                TransactionKind::Deposit
            ]
        );
        assert_eq!(
            amounts,
            vec![Decimal::from(200), Decimal::from(50), Decimal::new(1025, 2)]
        );
        assert_eq!(history.withdrawal_count(), 1);
    }

    #[test]
    fn test_timestamps_are_non_decreasing() {
        let mut history = History::new();
        for _ in 0..5 {
            history.record(&Transaction::deposit(Decimal::ONE));
        }

        let entries = history.entries();
        assert!(entries
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
    }

    #[test]
    fn test_formatted_timestamp_shape() {
        let mut history = History::new();
        history.record(&Transaction::deposit(Decimal::ONE));

        let formatted = history.entries()[0].formatted_timestamp();

        // dd-mm-yyyy hh:mm:ss
        assert_eq!(formatted.len(), 19);
        assert_eq!(&formatted[2..3], "-");
        assert_eq!(&formatted[5..6], "-");
        assert_eq!(&formatted[10..11], " ");
        assert_eq!(&formatted[13..14], ":");
    }
}
