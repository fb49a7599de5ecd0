//! Asynchronous CSV reader with batch interface
//!
//! Reads ledger commands from a CSV script in batches for the async
//! strategy.
//!
//! # Architecture
//!
//! ```text
//! CSV Reader → AsyncReader → Batches of LedgerCommands
//!                  ↓
//!           csv_format module
//!           (CsvRecord, convert_csv_record)
//! ```

use crate::io::csv_format::{convert_csv_record, CsvRecord};
use crate::types::LedgerCommand;
use csv_async::AsyncReaderBuilder;
use futures::io::AsyncRead;
use futures::stream::StreamExt;
use tracing::warn;

/// Asynchronous CSV reader
///
/// Memory use is bounded by the batch size, not the script length.
pub struct AsyncReader<R: AsyncRead + Unpin> {
    csv_reader: csv_async::AsyncDeserializer<R>,
    rows_read: u64,
}

impl<R: AsyncRead + Unpin + Send + 'static> AsyncReader<R> {
    pub fn new(reader: R) -> Self {
        let csv_reader = AsyncReaderBuilder::new()
            .flexible(true)
            .trim(csv_async::Trim::All)
            .create_deserializer(reader);

        Self {
            csv_reader,
            rows_read: 0,
        }
    }

    /// Read up to `batch_size` commands
    ///
    /// Rows that fail to parse are logged and skipped. An empty batch means
    /// the script is exhausted.
    pub async fn read_batch(&mut self, batch_size: usize) -> Vec<LedgerCommand> {
        let mut batch = Vec::with_capacity(batch_size);
        let mut records = self.csv_reader.deserialize::<CsvRecord>();

        while batch.len() < batch_size {
            match records.next().await {
                Some(Ok(csv_record)) => {
                    self.rows_read += 1;
                    match convert_csv_record(csv_record) {
                        Ok(command) => batch.push(command),
                        Err(e) => warn!(row = self.rows_read, error = %e, "skipping script row"),
                    }
                }
                Some(Err(e)) => {
                    self.rows_read += 1;
                    warn!(row = self.rows_read, error = %e, "CSV parse error");
                }
                None => break,
            }
        }

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::io::Cursor;
    use rust_decimal::Decimal;

    const HEADER: &str = "command,tax_id,account,amount,name,birth_date,address,kind\n";

    fn reader(body: &str) -> AsyncReader<Cursor<Vec<u8>>> {
        AsyncReader::new(Cursor::new(format!("{}{}", HEADER, body).into_bytes()))
    }

    #[tokio::test]
    async fn test_read_batch_in_chunks() {
        let mut async_reader = reader(
            "deposit,111,1,100\n\
             deposit,111,1,200\n\
             withdraw,111,1,50\n",
        );

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 2);
        assert!(matches!(
            batch[1],
            LedgerCommand::Deposit { amount, .. } if amount == Decimal::from(200)
        ));

        let batch = async_reader.read_batch(2).await;
        assert_eq!(batch.len(), 1);
        assert!(matches!(batch[0], LedgerCommand::Withdraw { .. }));

        assert!(async_reader.read_batch(2).await.is_empty());
    }

    #[tokio::test]
    async fn test_read_batch_empty_script() {
        let mut async_reader = reader("");
        assert!(async_reader.read_batch(10).await.is_empty());
    }

    #[tokio::test]
    async fn test_read_batch_skips_bad_rows() {
        let mut async_reader = reader(
            "transfer,111,1,100\n\
             deposit,abc,1,100\n\
             deposit,111,1,1.234\n\
             statement,111,1\n",
        );

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert!(matches!(batch[0], LedgerCommand::Statement { number: 1, .. }));
    }

    #[tokio::test]
    async fn test_read_batch_whitespace_and_case() {
        let mut async_reader = reader("  NEW_CLIENT  ,  111  ,,,  Ana  ,,,\n");

        let batch = async_reader.read_batch(10).await;

        assert_eq!(batch.len(), 1);
        assert!(matches!(&batch[0], LedgerCommand::NewClient(r) if r.name == "Ana"));
    }
}
